//! Login, registration, social login, logout and session restore.

use std::sync::Arc;

use url::Url;

use crate::client::ApiClient;
use crate::config::OAuthConfig;
use crate::envelope::Envelope;
use crate::error::ApiResult;
use crate::models::{LoginRequest, LoginResponse, RegistrationForm, User};
use crate::session::{Route, Session};
use crate::store::TokenPair;
use crate::validation::{validate_login, validate_registration};

/// Binds the API client to the session it authenticates.
pub struct AuthService {
    client: Arc<ApiClient>,
    session: Arc<Session>,
    oauth: OAuthConfig,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, session: Arc<Session>, oauth: OAuthConfig) -> Self {
        Self {
            client,
            session,
            oauth,
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Logs in with email and password.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`](crate::ApiError::Validation) if the input is rejected locally
    /// - [`ApiError::Application`](crate::ApiError::Application) if the server refuses the credentials
    /// - [`ApiError::Storage`](crate::ApiError::Storage) if the tokens cannot be persisted
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<User> {
        validate_login(request)?;
        let response = self.client.auth().login(request).await?.into_result()?;
        self.establish(response).await
    }

    /// Creates an account and logs straight into it.
    pub async fn register(&self, form: &RegistrationForm) -> ApiResult<User> {
        validate_registration(form)?;
        let response = self
            .client
            .auth()
            .register(&form.to_request())
            .await?
            .into_result()?;
        self.establish(response).await
    }

    /// Completes the social login redirect with the provider's authorization code.
    pub async fn social_login(&self, code: &str) -> ApiResult<User> {
        let response = self.client.auth().social_login(code).await?.into_result()?;
        self.establish(response).await
    }

    /// Provider page the user must visit to obtain an authorization code.
    pub fn authorize_url(&self, redirect_uri: &str) -> ApiResult<Url> {
        Ok(self.oauth.authorization_url(redirect_uri)?)
    }

    async fn establish(&self, response: LoginResponse) -> ApiResult<User> {
        let LoginResponse {
            access_token,
            refresh_token,
            user,
        } = response;
        let tokens = TokenPair::new(access_token, refresh_token);

        if let Err(e) = self.session.establish(&tokens, user.clone()).await {
            self.client.clear_auth();
            return Err(e.into());
        }
        self.client
            .set_auth(tokens.access_token, tokens.refresh_token);
        self.session.navigate(Route::Dashboard);

        tracing::info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Ends the session.
    ///
    /// The server is told first when there is something to revoke; its
    /// answer does not matter. Local state is always cleared.
    pub async fn logout(&self) {
        if self.client.is_authenticated() {
            match self.client.auth().logout().await {
                Ok(Envelope::Success(())) => {}
                Ok(envelope) => tracing::warn!(
                    error = envelope.error_message().unwrap_or("no message"),
                    "Server rejected logout"
                ),
                Err(e) => tracing::warn!(error = %e, "Logout request failed"),
            }
        }
        self.client.clear_auth();
        self.session.teardown().await;
    }

    /// Restores a persisted session at startup.
    ///
    /// Returns the current user when the stored tokens are still usable
    /// (after a silent refresh if needed). Any failure clears the stored
    /// tokens and the user and yields `None`.
    pub async fn restore(&self) -> Option<User> {
        let tokens = match self.session.persisted_tokens().await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                tracing::debug!("No persisted session");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted tokens");
                self.session.clear().await;
                return None;
            }
        };

        self.client
            .set_auth(tokens.access_token, tokens.refresh_token);

        match self
            .client
            .auth()
            .current_user()
            .await
            .and_then(Envelope::into_result)
        {
            Ok(user) => {
                self.session.state().set_user(user.clone());
                tracing::info!(user_id = %user.id, "Session restored");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not restore session");
                self.client.clear_auth();
                self.session.clear().await;
                None
            }
        }
    }
}
