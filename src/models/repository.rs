//! Repository descriptors from the service document.

use serde::Serialize;

/// One repository advertised by the service endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryInfo {
    /// Repository id, used to address objects inside it.
    pub id: String,
    /// Human-readable repository name.
    pub name: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub product: Option<String>,
    /// Object id of the repository's root folder.
    pub root_folder_id: String,
    /// Endpoint that all object requests for this repository go through.
    pub root_folder_url: String,
}

impl RepositoryInfo {
    /// Display label: the name when the server sets one, the id otherwise.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
