//! Configuration management.
//!
//! Settings come from three layers, lowest precedence first: built-in
//! defaults, a config file (TOML, YAML, or JSON), and `CMIS_*` environment
//! variables. The config file is either passed explicitly on the command
//! line or discovered in the working directory and the platform config
//! directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CmisError, Result};

/// Default User-Agent for repository requests.
pub const DEFAULT_USER_AGENT: &str = "cmisbrowse/0.2";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Repository connection settings, the `[cmis]` table of the config file.
///
/// Every field is optional here; validation against required keys happens
/// when a session is built, so the server can start with an incomplete
/// configuration and report the problem per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmisConfig {
    /// Credential for repository access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Credential for repository access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Browser-binding service endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Session locale country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Session locale language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Explicit repository id. When unset, the first repository reported
    /// by the service endpoint is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl CmisConfig {
    /// Apply `CMIS_*` environment variable overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_var("CMIS_USERNAME") {
            self.username = Some(v);
        }
        if let Some(v) = env_var("CMIS_PASSWORD") {
            self.password = Some(v);
        }
        if let Some(v) = env_var("CMIS_URL") {
            self.url = Some(v);
        }
        if let Some(v) = env_var("CMIS_COUNTRY") {
            self.country = Some(v);
        }
        if let Some(v) = env_var("CMIS_LANGUAGE") {
            self.language = Some(v);
        }
        if let Some(v) = env_var("CMIS_REPOSITORY") {
            self.repository = Some(v);
        }
        self
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Repository connection settings.
    #[serde(default)]
    pub cmis: CmisConfig,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a specific file path.
    /// Supports TOML, YAML, and JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            CmisError::Configuration(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents).map_err(|e| {
                CmisError::Configuration(format!("failed to parse TOML config: {}", e))
            })?,
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                CmisError::Configuration(format!("failed to parse YAML config: {}", e))
            })?,
            _ => serde_json::from_str(&contents).map_err(|e| {
                CmisError::Configuration(format!("failed to parse JSON config: {}", e))
            })?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Discover a config file in standard locations.
    ///
    /// Checks the working directory for `cmisbrowse.{toml,yaml,yml,json}`,
    /// then the platform config directory for `cmisbrowse/config.*`.
    pub fn discover() -> Option<PathBuf> {
        const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

        for ext in EXTENSIONS {
            let candidate = PathBuf::from(format!("cmisbrowse.{}", ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        let config_dir = dirs::config_dir()?.join("cmisbrowse");
        for ext in EXTENSIONS {
            let candidate = config_dir.join(format!("config.{}", ext));
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        None
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        settings.cmis = self.cmis.clone();
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Repository connection settings.
    pub cmis: CmisConfig,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cmis: CmisConfig::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Resolve settings from defaults, config file, and environment.
///
/// An explicit config path that cannot be read or parsed is an error; a
/// broken discovered file is logged and skipped so a stray file cannot
/// keep the tool from starting.
pub async fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await?,
        None => match Config::discover() {
            Some(path) => match Config::load_from_path(&path).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring config file {}: {}", path.display(), e);
                    Config::default()
                }
            },
            None => Config::default(),
        },
    };

    if let Some(ref path) = config.source_path {
        tracing::debug!("loaded configuration from {}", path.display());
    }

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings.cmis = settings.cmis.with_env_overrides();
    Ok(settings)
}
