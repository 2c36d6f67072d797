//! In-memory repository used by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use futures::stream;
use futures::StreamExt;

use crate::error::{CmisError, Result};
use crate::models::{Document, Folder, OtherObject, RepositoryInfo, RepositoryObject};

use super::{ChildPage, ContentStream, RepositoryClient};

/// An in-memory [`RepositoryClient`] with canned objects and call
/// counters, so tests can assert how much of it was touched.
pub(crate) struct FakeRepository {
    repositories: Vec<RepositoryInfo>,
    objects: HashMap<String, RepositoryObject>,
    children: HashMap<String, Vec<String>>,
    contents: HashMap<String, Vec<u8>>,
    info_calls: AtomicUsize,
    children_page_calls: AtomicUsize,
    content_calls: AtomicUsize,
}

impl FakeRepository {
    /// One repository (`repo-1`) with an empty root folder (`root`).
    pub fn new() -> Self {
        let mut fake = Self::with_repositories(vec![Self::repository_info("repo-1", "Main Repository")]);
        fake.objects.insert(
            "root".to_string(),
            RepositoryObject::Folder(Folder {
                id: "root".to_string(),
                name: String::new(),
                path: Some("/".to_string()),
                parent_id: None,
            }),
        );
        fake
    }

    pub fn with_repositories(repositories: Vec<RepositoryInfo>) -> Self {
        Self {
            repositories,
            objects: HashMap::new(),
            children: HashMap::new(),
            contents: HashMap::new(),
            info_calls: AtomicUsize::new(0),
            children_page_calls: AtomicUsize::new(0),
            content_calls: AtomicUsize::new(0),
        }
    }

    pub fn repository_info(id: &str, name: &str) -> RepositoryInfo {
        RepositoryInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            vendor: Some("Test Vendor".to_string()),
            product: Some("Test Repository".to_string()),
            root_folder_id: "root".to_string(),
            root_folder_url: format!("http://cmis.test/browser/{}/root", id),
        }
    }

    /// The first advertised repository.
    pub fn info(&self) -> RepositoryInfo {
        self.repositories[0].clone()
    }

    pub fn add_folder(&mut self, id: &str, name: &str, path: Option<&str>, parent: Option<&str>) {
        self.objects.insert(
            id.to_string(),
            RepositoryObject::Folder(Folder {
                id: id.to_string(),
                name: name.to_string(),
                path: path.map(str::to_string),
                parent_id: parent.map(str::to_string),
            }),
        );
        self.link(parent, id);
    }

    pub fn add_document(
        &mut self,
        id: &str,
        name: &str,
        mime_type: Option<&str>,
        filename: Option<&str>,
        parent: Option<&str>,
        content: &[u8],
    ) {
        self.objects.insert(
            id.to_string(),
            RepositoryObject::Document(Document {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: mime_type.map(str::to_string),
                filename: filename.map(str::to_string),
                content_length: Some(content.len() as u64),
                last_modified: Utc.with_ymd_and_hms(2014, 3, 18, 9, 30, 0).single(),
            }),
        );
        self.contents.insert(id.to_string(), content.to_vec());
        self.link(parent, id);
    }

    /// A document object whose content stream was never set.
    pub fn add_document_without_content(&mut self, id: &str, name: &str, parent: Option<&str>) {
        self.objects.insert(
            id.to_string(),
            RepositoryObject::Document(Document {
                id: id.to_string(),
                name: name.to_string(),
                mime_type: None,
                filename: None,
                content_length: None,
                last_modified: None,
            }),
        );
        self.link(parent, id);
    }

    pub fn add_other(&mut self, id: &str, name: &str, base_type: &str, parent: Option<&str>) {
        self.objects.insert(
            id.to_string(),
            RepositoryObject::Other(OtherObject {
                id: id.to_string(),
                name: name.to_string(),
                base_type: base_type.to_string(),
            }),
        );
        self.link(parent, id);
    }

    fn link(&mut self, parent: Option<&str>, id: &str) {
        if let Some(parent) = parent {
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(id.to_string());
        }
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn children_page_calls(&self) -> usize {
        self.children_page_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }

    /// Convenience for the common "one repo, some objects" setups.
    pub fn into_client(self) -> Arc<dyn RepositoryClient> {
        Arc::new(self)
    }
}

#[async_trait]
impl RepositoryClient for FakeRepository {
    async fn repository_infos(&self) -> Result<Vec<RepositoryInfo>> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.repositories.clone())
    }

    async fn object(
        &self,
        _repository: &RepositoryInfo,
        object_id: &str,
    ) -> Result<RepositoryObject> {
        self.objects
            .get(object_id)
            .cloned()
            .ok_or_else(|| CmisError::NotFound(object_id.to_string()))
    }

    async fn children_page(
        &self,
        _repository: &RepositoryInfo,
        folder_id: &str,
        skip_count: u64,
        max_items: u64,
    ) -> Result<ChildPage> {
        self.children_page_calls.fetch_add(1, Ordering::SeqCst);

        let ids = self.children.get(folder_id).cloned().unwrap_or_default();
        let total = ids.len();
        let start = (skip_count as usize).min(total);
        let end = (start + max_items as usize).min(total);

        let mut objects = Vec::with_capacity(end - start);
        for id in &ids[start..end] {
            let object = self
                .objects
                .get(id)
                .cloned()
                .ok_or_else(|| CmisError::NotFound(id.clone()))?;
            objects.push(object);
        }

        Ok(ChildPage {
            objects,
            has_more: end < total,
            num_items: Some(total as u64),
        })
    }

    async fn content(
        &self,
        _repository: &RepositoryInfo,
        document_id: &str,
    ) -> Result<ContentStream> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);

        let document = match self.objects.get(document_id) {
            Some(RepositoryObject::Document(d)) => d.clone(),
            Some(_) => return Err(CmisError::MissingContent(document_id.to_string())),
            None => return Err(CmisError::NotFound(document_id.to_string())),
        };
        let bytes = self
            .contents
            .get(document_id)
            .cloned()
            .ok_or_else(|| CmisError::MissingContent(document_id.to_string()))?;

        // hand the body back in two chunks so consumers see real streaming
        let mid = bytes.len() / 2;
        let chunks = vec![
            Ok(Bytes::copy_from_slice(&bytes[..mid])),
            Ok(Bytes::copy_from_slice(&bytes[mid..])),
        ];

        Ok(ContentStream {
            mime_type: document.mime_type.clone(),
            filename: document.filename.clone(),
            length: Some(bytes.len() as u64),
            stream: stream::iter(chunks).boxed(),
        })
    }
}
