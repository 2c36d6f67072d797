//! Document retrieval.

use std::fmt;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::client::ContentStream;
use crate::error::{CmisError, Result};
use crate::session::Session;

/// A document's content stream plus the metadata needed to serve it.
///
/// Header-level metadata from the content response wins; gaps are filled
/// from the document's properties, and the filename falls back to the
/// document name so there is always something to save as.
pub struct DocumentContent {
    pub id: String,
    pub name: String,
    pub mime_type: Option<String>,
    pub filename: String,
    pub length: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes>>,
}

impl fmt::Debug for DocumentContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentContent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("filename", &self.filename)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Resolve a document and open its content stream.
///
/// The object is looked up first so non-documents fail as a type
/// mismatch rather than a protocol-level content fault. The stream is
/// handed through untouched; bytes flow from the repository to the
/// caller without buffering the body.
pub async fn fetch_document(session: &Session, document_id: &str) -> Result<DocumentContent> {
    let document = match session.object(document_id).await? {
        crate::models::RepositoryObject::Document(document) => document,
        other => {
            return Err(CmisError::TypeMismatch {
                object_id: other.id().to_string(),
                expected: "document",
            })
        }
    };

    let ContentStream {
        mime_type,
        filename,
        length,
        stream,
    } = session.content(&document.id).await?;

    let filename = filename
        .or_else(|| document.filename.clone())
        .unwrap_or_else(|| document.name.clone());

    Ok(DocumentContent {
        id: document.id,
        mime_type: mime_type.or(document.mime_type),
        length: length.or(document.content_length),
        name: document.name,
        filename,
        stream,
    })
}
