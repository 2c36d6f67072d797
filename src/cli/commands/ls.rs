//! Folder listing command.

use console::style;

use crate::config::Settings;
use crate::services::list_folder;
use crate::session::SessionBuilder;
use crate::utils::{format_date, format_size, mime_icon};

/// List the children of a folder (the root folder when no id is given).
pub async fn cmd_ls(settings: &Settings, folder_id: Option<&str>) -> anyhow::Result<()> {
    let session = SessionBuilder::new(settings.clone()).create_session().await?;
    let listing = list_folder(&session, folder_id).await?;

    let path = if listing.breadcrumb.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", listing.breadcrumb.join("/"))
    };
    println!(
        "{}",
        style(format!("{} ({})", path, session.repository().label())).bold()
    );

    for folder in &listing.folders {
        println!(
            "  {:<7} {:<40} {}",
            "[dir]",
            folder.name,
            style(&folder.id).dim()
        );
    }
    for document in &listing.documents {
        let mime = document.mime_type.as_deref().unwrap_or("");
        let size = document
            .content_length
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let modified = document
            .last_modified
            .as_ref()
            .map(format_date)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<7} {:<40} {:>10}  {:<16} {}",
            mime_icon(mime),
            document.name,
            size,
            modified,
            style(&document.id).dim()
        );
    }

    if listing.folders.is_empty() && listing.documents.is_empty() {
        println!("  {}", style("(empty)").dim());
    } else {
        println!(
            "\n{} folders, {} documents",
            listing.folders.len(),
            listing.documents.len()
        );
    }

    Ok(())
}
