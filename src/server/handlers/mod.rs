//! HTTP request handlers for the web server.

mod browse;
mod download;
mod static_files;

pub use browse::{browse_folder, browse_root};
pub use download::download_document;
pub use static_files::serve_css;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::templates::ErrorTemplate;
use crate::error::CmisError;

/// Map an error to the HTTP status it should travel with.
fn status_for(error: &CmisError) -> StatusCode {
    match error {
        CmisError::NotFound(_) | CmisError::MissingContent(_) => StatusCode::NOT_FOUND,
        CmisError::TypeMismatch { .. } => StatusCode::BAD_REQUEST,
        CmisError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Render an error as the HTML error page.
fn error_page(error: &CmisError) -> Response {
    let status = status_for(error);
    let title = if status == StatusCode::NOT_FOUND {
        "Not Found"
    } else if status == StatusCode::BAD_REQUEST {
        "Bad Request"
    } else {
        "Error"
    };
    let template = ErrorTemplate {
        title,
        message: &error.to_string(),
    };
    (
        status,
        Html(template.render().unwrap_or_else(|_| error.to_string())),
    )
        .into_response()
}

/// Render an error as plain text, for the download path.
fn plain_error(error: &CmisError) -> Response {
    (status_for(error), error.to_string()).into_response()
}
