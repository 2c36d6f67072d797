//! Document download handler.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};

use super::super::AppState;
use super::plain_error;
use crate::services::fetch_document;

/// Stream a document's content to the client.
pub async fn download_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Response {
    let session = match state.builder.create_session().await {
        Ok(session) => session,
        Err(e) => return plain_error(&e),
    };
    let content = match fetch_document(&session, &document_id).await {
        Ok(content) => content,
        Err(e) => return plain_error(&e),
    };

    let mime = content.mime_type.clone().unwrap_or_else(|| {
        mime_guess::from_path(&content.filename)
            .first_or_octet_stream()
            .to_string()
    });
    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_filename(&content.filename)
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&mime)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );
    if let Some(length) = content.length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    }

    tracing::debug!(document = %content.id, mime = %mime, "streaming document content");
    (headers, Body::from_stream(content.stream)).into_response()
}

/// Reduce a filename to characters that are safe inside a quoted
/// Content-Disposition value.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && !matches!(c, '"' | '\\' | '/') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}
