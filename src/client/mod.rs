//! Repository access.
//!
//! [`RepositoryClient`] is the seam between the rest of the crate and the
//! protocol that reaches the repository; [`BrowserBindingClient`] is the
//! production implementation over the CMIS browser binding.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::StreamExt;

use crate::error::Result;
use crate::models::{RepositoryInfo, RepositoryObject};

mod browser;
#[cfg(test)]
pub(crate) mod fake;

pub use browser::BrowserBindingClient;

/// Children are fetched in pages of this many objects.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// One page of a folder's children.
#[derive(Debug, Clone)]
pub struct ChildPage {
    pub objects: Vec<RepositoryObject>,
    /// Whether the repository reports more children past this page.
    pub has_more: bool,
    /// Total child count, when the repository reports one.
    pub num_items: Option<u64>,
}

/// Document content as a byte stream, plus whatever metadata the
/// repository sent along with it.
pub struct ContentStream {
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub length: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes>>,
}

/// Protocol-level access to a CMIS service endpoint.
///
/// Implementations carry credentials and endpoint addresses, never
/// per-request state; every call stands on its own.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// All repositories the service endpoint advertises, in the order the
    /// service document lists them.
    async fn repository_infos(&self) -> Result<Vec<RepositoryInfo>>;

    /// Fetch a single object by id.
    async fn object(
        &self,
        repository: &RepositoryInfo,
        object_id: &str,
    ) -> Result<RepositoryObject>;

    /// Fetch one page of a folder's children.
    async fn children_page(
        &self,
        repository: &RepositoryInfo,
        folder_id: &str,
        skip_count: u64,
        max_items: u64,
    ) -> Result<ChildPage>;

    /// Open the content stream of a document.
    async fn content(
        &self,
        repository: &RepositoryInfo,
        document_id: &str,
    ) -> Result<ContentStream>;
}

struct PageCursor {
    client: Arc<dyn RepositoryClient>,
    repository: RepositoryInfo,
    folder_id: String,
    page_size: u64,
    skip: u64,
    buffer: VecDeque<RepositoryObject>,
    exhausted: bool,
}

/// Lazily enumerate all children of a folder, fetching pages on demand.
///
/// Every call builds an independent stream that starts from the first
/// page. An empty page ends enumeration even if the server claims more
/// items remain, so a misbehaving server cannot loop us forever.
pub fn children_stream(
    client: Arc<dyn RepositoryClient>,
    repository: RepositoryInfo,
    folder_id: &str,
    page_size: u64,
) -> BoxStream<'static, Result<RepositoryObject>> {
    let cursor = PageCursor {
        client,
        repository,
        folder_id: folder_id.to_string(),
        page_size,
        skip: 0,
        buffer: VecDeque::new(),
        exhausted: false,
    };

    stream::try_unfold(cursor, |mut cursor| async move {
        loop {
            if let Some(object) = cursor.buffer.pop_front() {
                return Ok(Some((object, cursor)));
            }
            if cursor.exhausted {
                return Ok(None);
            }

            let page = cursor
                .client
                .children_page(
                    &cursor.repository,
                    &cursor.folder_id,
                    cursor.skip,
                    cursor.page_size,
                )
                .await?;

            cursor.skip += page.objects.len() as u64;
            cursor.exhausted = !page.has_more || page.objects.is_empty();
            cursor.buffer.extend(page.objects);
        }
    })
    .boxed()
}
