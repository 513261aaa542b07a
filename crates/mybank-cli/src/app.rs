use std::sync::Arc;

use anyhow::{Context, Result};
use mybank_client::models::User;
use mybank_client::{
    ApiClient, ApiError, ApiResult, AuthService, ClientConfig, Envelope, FileTokenStore,
    RouteTracker, Session, load_config,
};

use crate::cli::Cli;

/// Loads the config file and environment, then applies command-line overrides.
pub fn load(cli: &Cli) -> Result<ClientConfig> {
    let mut config =
        load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(server) = &cli.server {
        config.api.base_url = server.clone();
    }
    if let Some(profile) = &cli.profile {
        config.storage.profile = profile.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Everything a command needs to talk to the API on behalf of a profile.
pub struct App {
    auth: AuthService,
    store: FileTokenStore,
}

impl App {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let store = token_store(config)?;
        let session = Arc::new(Session::new(
            Arc::new(store.clone()),
            Arc::new(RouteTracker::new()),
        ));
        let client = Arc::new(ApiClient::new(&config.api, session.clone()).map_err(friendly)?);
        Ok(Self {
            auth: AuthService::new(client, session, config.oauth.clone()),
            store,
        })
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn client(&self) -> &ApiClient {
        self.auth.client()
    }

    pub fn store(&self) -> &FileTokenStore {
        &self.store
    }

    /// Restores the stored session for commands that need a logged-in user.
    pub async fn require_user(&self) -> Result<User> {
        self.auth
            .restore()
            .await
            .context("Not logged in. Run `mybank login` first.")
    }
}

pub fn token_store(config: &ClientConfig) -> Result<FileTokenStore> {
    let profile = &config.storage.profile;
    match &config.storage.credentials_dir {
        Some(dir) => Ok(FileTokenStore::new(dir, profile)),
        None => Ok(FileTokenStore::in_default_dir(profile)?),
    }
}

/// Converts a client error into the message shown to the user.
///
/// Server and validation messages are shown as-is; everything else keeps the
/// underlying cause attached.
pub fn friendly(err: ApiError) -> anyhow::Error {
    tracing::debug!(error = ?err, "Request failed");
    match err {
        ApiError::Application { .. } | ApiError::Validation(_) => {
            anyhow::anyhow!(err.user_message())
        }
        ApiError::Unauthorized { .. } if err.server_message().is_some() => {
            anyhow::anyhow!(err.user_message())
        }
        other => {
            let message = other.user_message();
            anyhow::Error::new(other).context(message)
        }
    }
}

/// Unwraps a success envelope, turning any failure into a user-facing error.
pub fn data<T>(result: ApiResult<Envelope<T>>) -> Result<T> {
    result.and_then(Envelope::into_result).map_err(friendly)
}
