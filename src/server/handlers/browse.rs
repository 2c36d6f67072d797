//! Folder listing handlers.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use super::super::templates::{BrowseTemplate, DocumentRow, FolderRow};
use super::super::AppState;
use super::error_page;
use crate::services::list_folder;

/// Show the repository root folder.
pub async fn browse_root(State(state): State<AppState>) -> Response {
    render_listing(&state, None).await
}

/// Show an arbitrary folder by object id.
pub async fn browse_folder(
    State(state): State<AppState>,
    Path(folder_id): Path<String>,
) -> Response {
    render_listing(&state, Some(folder_id)).await
}

async fn render_listing(state: &AppState, folder_id: Option<String>) -> Response {
    let session = match state.builder.create_session().await {
        Ok(session) => session,
        Err(e) => return error_page(&e),
    };
    let listing = match list_folder(&session, folder_id.as_deref()).await {
        Ok(listing) => listing,
        Err(e) => return error_page(&e),
    };

    // The root folder usually has an empty name; fall back to the
    // repository label so the page always has a heading.
    let title = if listing.folder.name.is_empty() {
        session.repository().label().to_string()
    } else {
        listing.folder.name.clone()
    };

    let folders: Vec<FolderRow> = listing.folders.iter().map(FolderRow::from_folder).collect();
    let documents: Vec<DocumentRow> = listing
        .documents
        .iter()
        .map(DocumentRow::from_document)
        .collect();
    let is_empty = folders.is_empty() && documents.is_empty();

    let template = BrowseTemplate {
        title: &title,
        repository_name: session.repository().label(),
        has_parent: listing.parent.is_some(),
        parent_href_val: listing
            .parent
            .as_ref()
            .map(|parent| format!("/folder/{}", urlencoding::encode(&parent.id)))
            .unwrap_or_default(),
        breadcrumb: listing.breadcrumb,
        folders,
        documents,
        is_empty,
    };
    Html(template.render().unwrap_or_else(|e| format!("Template error: {}", e))).into_response()
}
