//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/
//! directory, so template validity is checked at compile time.

use askama::Template;

use crate::models::{Document, Folder};
use crate::utils::{format_date, format_size, mime_icon};

/// One folder row in a listing.
pub struct FolderRow {
    pub name: String,
    pub href: String,
}

impl FolderRow {
    pub fn from_folder(folder: &Folder) -> Self {
        Self {
            name: folder.name.clone(),
            href: format!("/folder/{}", urlencoding::encode(&folder.id)),
        }
    }
}

/// One document row in a listing.
pub struct DocumentRow {
    pub name: String,
    pub href: String,
    pub icon: String,
    pub mime_type: String,
    pub size_str: String,
    pub date_str: String,
}

impl DocumentRow {
    pub fn from_document(document: &Document) -> Self {
        let mime_type = document.mime_type.clone().unwrap_or_default();
        Self {
            name: document.name.clone(),
            href: format!("/document/{}", urlencoding::encode(&document.id)),
            icon: mime_icon(&mime_type).to_string(),
            mime_type,
            size_str: document
                .content_length
                .map(format_size)
                .unwrap_or_else(|| "-".to_string()),
            date_str: document
                .last_modified
                .as_ref()
                .map(format_date)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Folder listing page.
#[derive(Template)]
#[template(path = "browse.html")]
pub struct BrowseTemplate<'a> {
    pub title: &'a str,
    pub repository_name: &'a str,
    pub breadcrumb: Vec<String>,
    pub has_parent: bool,
    pub parent_href_val: String,
    pub folders: Vec<FolderRow>,
    pub documents: Vec<DocumentRow>,
    pub is_empty: bool,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}
