//! Client configuration.
//!
//! Sources are merged in order, later ones overriding earlier ones:
//! 1. `ClientConfig::default()`
//! 2. an optional TOML file
//! 3. environment variables prefixed `CATALOG_ADMIN_` (e.g. `CATALOG_ADMIN_BASE_URL`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const ENV_PREFIX: &str = "CATALOG_ADMIN_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Everything the client needs at process start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the admin API, e.g. `http://localhost:8080/api/admin/v1`.
    /// Operation paths are appended to it verbatim.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/admin/v1".to_string(),
            timeout_secs: 30,
            user_agent: concat!("catalog-admin/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
        .validated()
    }

    /// Check the base URL and normalize away a trailing slash.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

/// Builds a [`ClientConfig`] from defaults, a TOML file and the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));
        if let Some(path) = &self.config_path {
            debug!(path = %path.display(), exists = path.exists(), "config file");
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        Self::extract(self.figment())
    }

    pub fn extract(figment: Figment) -> Result<ClientConfig, ConfigError> {
        let config: ClientConfig = figment.extract().map_err(Box::new)?;
        config.validated()
    }
}
