//! Service layer between sessions and the interfaces.
//!
//! Domain logic separated from UI concerns, usable from both the web
//! server and the CLI.

pub mod download;
pub mod listing;

pub use download::{fetch_document, DocumentContent};
pub use listing::{list_folder, FolderListing};
