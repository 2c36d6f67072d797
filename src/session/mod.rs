//! Session establishment and the per-request repository view.
//!
//! A session is built fresh for every request and thrown away afterwards.
//! Nothing is cached between requests, so configuration changes and
//! repository restarts are picked up on the next page load, at the cost
//! of one service-document round trip per request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use url::Url;

use crate::client::{
    self, BrowserBindingClient, ContentStream, RepositoryClient, DEFAULT_PAGE_SIZE,
};
use crate::config::{CmisConfig, Settings};
use crate::error::{CmisError, Result};
use crate::models::{Folder, RepositoryInfo, RepositoryObject};

/// Protocol binding used to reach the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// CMIS 1.1 browser binding (JSON over HTTP).
    Browser,
}

impl Binding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Browser => "browser",
        }
    }
}

/// Validated connection parameters for one service endpoint.
#[derive(Debug, Clone)]
pub struct SessionParameters {
    pub username: String,
    pub password: String,
    pub service_url: Url,
    pub binding: Binding,
    pub country: String,
    pub language: String,
    /// Explicit repository id; the first advertised repository when unset.
    pub repository_id: Option<String>,
}

impl SessionParameters {
    /// Build parameters from configuration, rejecting missing keys.
    pub fn from_config(config: &CmisConfig) -> Result<Self> {
        let username = require(&config.username, "cmis.username")?;
        let password = require(&config.password, "cmis.password")?;
        let url = require(&config.url, "cmis.url")?;
        let country = require(&config.country, "cmis.country")?;
        let language = require(&config.language, "cmis.language")?;

        let service_url = Url::parse(&url)
            .map_err(|e| CmisError::Configuration(format!("cmis.url is not a valid URL: {}", e)))?;

        Ok(Self {
            username,
            password,
            service_url,
            binding: Binding::Browser,
            country,
            language,
            repository_id: config.repository.clone(),
        })
    }

    /// Locale sent as Accept-Language, e.g. `en-US`.
    pub fn accept_language(&self) -> String {
        format!("{}-{}", self.language, self.country)
    }
}

fn require(value: &Option<String>, key: &str) -> Result<String> {
    value
        .as_ref()
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| CmisError::Configuration(format!("{} is not set", key)))
}

/// Select the repository a session binds to.
///
/// With no explicit id the first advertised repository wins, matching
/// clients that take `repositories[0]` from the service document. A
/// configured id the endpoint does not advertise fails the same way an
/// empty service document does.
pub fn select_repository<'a>(
    preferred: Option<&str>,
    repositories: &'a [RepositoryInfo],
) -> Result<&'a RepositoryInfo> {
    match preferred {
        Some(id) => {
            if let Some(repository) = repositories.iter().find(|r| r.id == id) {
                return Ok(repository);
            }
            tracing::warn!(repository = id, "configured repository not advertised");
            Err(CmisError::NoRepositoryFound)
        }
        None => repositories.first().ok_or(CmisError::NoRepositoryFound),
    }
}

/// Builds a session per request from the configured parameters.
pub struct SessionBuilder {
    settings: Settings,
    /// Client override; production builds a browser-binding client from
    /// the validated parameters.
    client: Option<Arc<dyn RepositoryClient>>,
}

impl SessionBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            client: None,
        }
    }

    /// Use this client instead of building one from configuration.
    pub fn with_client(mut self, client: Arc<dyn RepositoryClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Repository id preferred by configuration, if any.
    pub fn preferred_repository(&self) -> Option<&str> {
        self.settings.cmis.repository.as_deref()
    }

    /// Validate configuration and ask the service endpoint for its
    /// repositories, without binding to one.
    pub async fn repository_infos(&self) -> Result<Vec<RepositoryInfo>> {
        self.client()?.repository_infos().await
    }

    /// Validate configuration, discover repositories, and bind to one.
    pub async fn create_session(&self) -> Result<Session> {
        let client = self.client()?;
        let repositories = client.repository_infos().await?;
        let repository = select_repository(self.preferred_repository(), &repositories)?.clone();
        tracing::debug!(repository = %repository.id, "session established");
        Ok(Session { repository, client })
    }

    /// Configuration problems surface here, before anything goes over
    /// the wire.
    fn client(&self) -> Result<Arc<dyn RepositoryClient>> {
        let params = SessionParameters::from_config(&self.settings.cmis)?;
        if let Some(ref client) = self.client {
            return Ok(Arc::clone(client));
        }
        tracing::debug!(
            binding = params.binding.as_str(),
            url = %params.service_url,
            "building repository client"
        );
        let client = BrowserBindingClient::new(
            &params,
            &self.settings.user_agent,
            Duration::from_secs(self.settings.request_timeout),
        )?;
        Ok(Arc::new(client))
    }
}

/// One request's view of the bound repository.
pub struct Session {
    repository: RepositoryInfo,
    client: Arc<dyn RepositoryClient>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn repository(&self) -> &RepositoryInfo {
        &self.repository
    }

    /// The repository's root folder object.
    pub async fn root_folder(&self) -> Result<Folder> {
        match self.object(&self.repository.root_folder_id).await? {
            RepositoryObject::Folder(folder) => Ok(folder),
            other => Err(CmisError::TypeMismatch {
                object_id: other.id().to_string(),
                expected: "folder",
            }),
        }
    }

    pub async fn object(&self, object_id: &str) -> Result<RepositoryObject> {
        self.client.object(&self.repository, object_id).await
    }

    /// Lazily enumerate all children of a folder; pages are fetched on
    /// demand and each call starts over from the first page.
    pub fn children(&self, folder_id: &str) -> BoxStream<'static, Result<RepositoryObject>> {
        client::children_stream(
            Arc::clone(&self.client),
            self.repository.clone(),
            folder_id,
            DEFAULT_PAGE_SIZE,
        )
    }

    pub async fn content(&self, document_id: &str) -> Result<ContentStream> {
        self.client.content(&self.repository, document_id).await
    }
}
