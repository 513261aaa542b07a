//! Client configuration.
//!
//! Settings come from an optional TOML file (`mybank.toml` in the working
//! directory by default) and are overridden by environment variables with
//! the `MYBANK` prefix and `__` separator, e.g. `MYBANK__API__BASE_URL`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default config file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mybank.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin of the backend, without the `/api/v1` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".into()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Third-party social login (authorization code redirect flow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
}

fn default_authorize_url() -> String {
    "https://kauth.kakao.com/oauth/authorize".into()
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            authorize_url: default_authorize_url(),
        }
    }
}

impl OAuthConfig {
    /// Builds the provider authorize URL the user is sent to.
    pub fn authorization_url(&self, redirect_uri: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
            ],
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for persisted tokens; the platform config dir when unset.
    #[serde(default)]
    pub credentials_dir: Option<PathBuf>,
    #[serde(default = "default_profile")]
    pub profile: String,
}

fn default_profile() -> String {
    "default".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credentials_dir: None,
            profile: default_profile(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config build error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("api.base_url {url:?} is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("api.request_timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("oauth.authorize_url is invalid: {0}")]
    InvalidAuthorizeUrl(url::ParseError),

    #[error("storage.profile must not be empty")]
    EmptyProfile,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.api.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.api.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.api.base_url.clone(),
                reason: format!("unsupported scheme {:?}", base.scheme()),
            });
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Url::parse(&self.oauth.authorize_url).map_err(ConfigError::InvalidAuthorizeUrl)?;
        if self.storage.profile.trim().is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        Ok(())
    }
}

/// Loads configuration from `path` (or [`DEFAULT_CONFIG_FILE`] if present),
/// applies `MYBANK__*` environment overrides and validates the result.
/// A missing file is not an error; defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let mut builder = Config::builder();
    let file = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if file.exists() {
        builder = builder.add_source(File::from(file));
    }
    builder = builder.add_source(
        Environment::with_prefix("MYBANK")
            .try_parsing(true)
            .separator("__"),
    );
    let cfg: ClientConfig = builder.build()?.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}
