//! Error types shared across the crate.

use thiserror::Error;

/// Errors raised while resolving configuration, talking to a repository,
/// or interpreting what it sent back.
#[derive(Debug, Error)]
pub enum CmisError {
    /// A required configuration key is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service endpoint advertised no repository the session could
    /// bind to, either none at all or none matching the configured id.
    #[error("no usable repository at the service endpoint")]
    NoRepositoryFound,

    /// The repository has no object with the requested id.
    #[error("no object with id {0}")]
    NotFound(String),

    /// The object exists but is not the kind the operation needs.
    #[error("object {object_id} is not a {expected}")]
    TypeMismatch {
        object_id: String,
        expected: &'static str,
    },

    /// The document exists but carries no content stream.
    #[error("document {0} has no content stream")]
    MissingContent(String),

    /// The request never produced a usable response.
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A repository fault we do not translate to a more specific variant.
    #[error("repository error {status}: {exception}: {message}")]
    Repository {
        status: u16,
        exception: String,
        message: String,
    },

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response from repository: {0}")]
    InvalidResponse(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CmisError>;
