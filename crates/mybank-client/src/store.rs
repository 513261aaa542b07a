//! Durable token storage.
//!
//! The session credentials survive process restarts as two string values
//! under the fixed keys [`ACCESS_TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`].
//! A stored pair is only usable when both values are present; anything else
//! loads as "no session".

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// An access/refresh token pair.
///
/// Serializes with the same camelCase keys the backend uses for the
/// refresh response, so it doubles as that payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Errors from token storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed token file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

/// Durable storage for the session token pair.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored pair. Returns `None` unless both tokens are present.
    async fn load(&self) -> Result<Option<TokenPair>, StoreError>;

    /// Replaces the stored pair.
    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError>;

    /// Removes both tokens. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// On-disk representation: a flat object keyed by the fixed storage keys.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredTokens {
    fn into_pair(self) -> Option<TokenPair> {
        match (self.access_token, self.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(TokenPair::new(access, refresh))
            }
            _ => None,
        }
    }
}

/// Token store backed by a JSON file per profile.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Stores tokens for `profile` under `dir`.
    pub fn new(dir: impl AsRef<Path>, profile: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("tokens.{profile}.json")),
        }
    }

    /// Stores tokens for `profile` under the platform config directory
    /// (`~/.config/mybank` on Linux).
    pub fn in_default_dir(profile: &str) -> Result<Self, StoreError> {
        let dir = default_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(dir, profile))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Platform directory for MyBank client state.
pub fn default_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mybank"))
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredTokens = serde_json::from_str(&content)?;
        Ok(stored.into_pair())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let stored = StoredTokens {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        tokio::fs::write(&self.path, content).await?;
        restrict_permissions(&self.path).await?;
        tracing::debug!(path = %self.path.display(), "Saved session tokens");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed session tokens");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `tokens`.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    /// Synchronous view of the stored pair.
    pub fn snapshot(&self) -> Option<TokenPair> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn replace(&self, tokens: Option<TokenPair>) {
        *self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = tokens;
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(self.snapshot())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        self.replace(Some(tokens.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.replace(None);
        Ok(())
    }
}
