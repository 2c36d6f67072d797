//! Objects returned by repository queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A folder object.
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    /// Absolute path within the repository, when the server reports one.
    pub path: Option<String>,
    pub parent_id: Option<String>,
}

/// A document object together with its content-stream metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub content_length: Option<u64>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Any object a repository can hand back.
///
/// Repositories define base types beyond folders and documents
/// (relationships, policies, items); those come through as `Other`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepositoryObject {
    Folder(Folder),
    Document(Document),
    Other(OtherObject),
}

/// An object of a base type the browser does not render.
#[derive(Debug, Clone, Serialize)]
pub struct OtherObject {
    pub id: String,
    pub name: String,
    pub base_type: String,
}

impl RepositoryObject {
    pub fn id(&self) -> &str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Document(d) => &d.id,
            Self::Other(o) => &o.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Document(d) => &d.name,
            Self::Other(o) => &o.name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}
