//! Folder listing.

use futures::TryStreamExt;

use crate::error::{CmisError, Result};
use crate::models::{Document, Folder, RepositoryObject};
use crate::session::Session;

/// Everything one folder page needs: the folder itself, its ancestry,
/// and its children split by kind.
#[derive(Debug, Clone)]
pub struct FolderListing {
    pub folder: Folder,
    /// Path segments from the root down to this folder; empty at the root.
    pub breadcrumb: Vec<String>,
    /// Parent folder; absent at the root.
    pub parent: Option<Folder>,
    /// Child folders, sorted by name.
    pub folders: Vec<Folder>,
    /// Child documents, sorted by name.
    pub documents: Vec<Document>,
}

/// List a folder's children.
///
/// A missing or blank `folder_id` means the repository root, whose
/// parent is always reported as absent. Children of base types other
/// than folder and document are skipped.
pub async fn list_folder(session: &Session, folder_id: Option<&str>) -> Result<FolderListing> {
    let requested = folder_id.map(str::trim).filter(|id| !id.is_empty());

    let (folder, parent) = match requested {
        None => (session.root_folder().await?, None),
        Some(id) => {
            let folder = match session.object(id).await? {
                RepositoryObject::Folder(folder) => folder,
                other => {
                    return Err(CmisError::TypeMismatch {
                        object_id: other.id().to_string(),
                        expected: "folder",
                    })
                }
            };
            let parent = match folder.parent_id.as_deref() {
                Some(parent_id) => match session.object(parent_id).await? {
                    RepositoryObject::Folder(parent) => Some(parent),
                    other => {
                        return Err(CmisError::InvalidResponse(format!(
                            "parent {} of folder {} is not a folder",
                            other.id(),
                            folder.id
                        )))
                    }
                },
                None => None,
            };
            (folder, parent)
        }
    };

    let breadcrumb = breadcrumb(folder.path.as_deref().unwrap_or_default());

    let mut folders = Vec::new();
    let mut documents = Vec::new();
    let mut children = session.children(&folder.id);
    while let Some(child) = children.try_next().await? {
        match child {
            RepositoryObject::Folder(child) => folders.push(child),
            RepositoryObject::Document(child) => documents.push(child),
            RepositoryObject::Other(child) => {
                tracing::debug!(
                    id = %child.id,
                    base_type = %child.base_type,
                    "skipping child of unsupported base type"
                );
            }
        }
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    documents.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(FolderListing {
        folder,
        breadcrumb,
        parent,
        folders,
        documents,
    })
}

/// Split a repository path into breadcrumb segments, dropping empties.
/// The root path `/` yields no segments.
pub fn breadcrumb(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
