//! Router configuration for the web server.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::browse_root))
        .route("/folder/:folder_id", get(handlers::browse_folder))
        .route("/document/:document_id", get(handlers::download_document))
        .route("/static/style.css", get(handlers::serve_css))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
