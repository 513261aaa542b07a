//! Authenticated HTTP client.
//!
//! [`ApiClient`] stamps every request with the current access token and
//! decodes the response envelope. On `401 Unauthorized` it runs the refresh
//! protocol:
//!
//! 1. A request that has already been retried once propagates the failure.
//! 2. Without a refresh token the failure propagates immediately.
//!    Credential exchanges (login, registration, social login, refresh) are
//!    sent anonymously and never enter the protocol.
//! 3. Otherwise a dedicated, unauthenticated `POST /api/v1/auth/refresh` is
//!    issued with the current refresh token.
//! 4. On success the new pair replaces the in-memory copy, is persisted via
//!    the [`SessionSink`], and the original request is re-issued exactly once
//!    with the new access token.
//! 5. On failure the in-memory pair is cleared, the sink tears the session
//!    down, and the caller gets [`ApiError::SessionExpired`].
//!
//! When the protocol gives up, the server's message from the `401` envelope
//! is carried on [`ApiError::Unauthorized`].
//!
//! Refreshes are coalesced: they run one at a time, and a request whose
//! stamped token has already been replaced by a concurrent refresh reuses
//! the new token instead of refreshing again.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ApiConfig;
use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::models::RefreshRequest;
use crate::session::SessionSink;
use crate::store::TokenPair;

/// Path of the token refresh endpoint.
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Number of times a request may be re-issued after a successful refresh.
const MAX_AUTH_RETRIES: u32 = 1;

/// Immutable description of one API call.
///
/// The client re-materializes it for every attempt, so a retried request is
/// byte-for-byte the original apart from its Authorization header.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    anonymous: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            anonymous: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }

    /// Sends without an Authorization header and skips the refresh protocol.
    /// A `401` on such a request is a rejection of the credentials it carries.
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// HTTP client for the MyBank API with bearer authorization and silent
/// token refresh.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: RwLock<Option<TokenPair>>,
    refresh_lock: Mutex<()>,
    sink: Arc<dyn SessionSink>,
}

impl ApiClient {
    /// Creates a client for `config.base_url` reporting token events to `sink`.
    pub fn new(config: &ApiConfig, sink: Arc<dyn SessionSink>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            sink,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the in-memory token pair. No I/O.
    pub fn set_auth(&self, access_token: impl Into<String>, refresh_token: impl Into<String>) {
        self.replace_tokens(Some(TokenPair::new(access_token, refresh_token)));
    }

    /// Drops the in-memory token pair.
    pub fn clear_auth(&self) {
        self.replace_tokens(None);
    }

    /// `true` iff an access token is currently set.
    pub fn is_authenticated(&self) -> bool {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current in-memory pair.
    pub fn tokens(&self) -> Option<TokenPair> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_tokens(&self, tokens: Option<TokenPair>) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = tokens;
    }

    fn access_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Envelope<T>> {
        self.send(&ApiRequest::get(path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(&ApiRequest::post(path).json(body)?).await
    }

    /// `POST` without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Envelope<T>> {
        self.send(&ApiRequest::post(path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(&ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Envelope<T>> {
        self.send(&ApiRequest::delete(path)).await
    }

    /// Issues `request`, running the refresh protocol on `401`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if no response was received
    /// - [`ApiError::Unauthorized`] if authorization failed and could not be
    ///   recovered, with the server's message when the body was an envelope
    /// - [`ApiError::SessionExpired`] if the refresh failed and the session was cleared
    /// - [`ApiError::Http`] / [`ApiError::Decode`] if the body is not an envelope
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<Envelope<T>> {
        let mut retries = 0;
        loop {
            let stamped = if request.anonymous {
                None
            } else {
                self.access_token()
            };
            let response = self.dispatch(request, stamped.as_deref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return decode(response).await;
            }

            if request.anonymous {
                return Err(unauthorized(response).await);
            }
            if retries >= MAX_AUTH_RETRIES {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    "Unauthorized after retry; giving up"
                );
                return Err(unauthorized(response).await);
            }
            retries += 1;

            if !self.recover(stamped.as_deref()).await? {
                return Err(unauthorized(response).await);
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> ApiResult<Response> {
        let mut builder = self.http.request(request.method.clone(), self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            authorized = token.is_some(),
            "Sending request"
        );
        Ok(builder.send().await?)
    }

    /// Makes a fresh access token available after a `401` on a request
    /// stamped with `stale`. Returns `false` when there is nothing to refresh.
    async fn recover(&self, stale: Option<&str>) -> ApiResult<bool> {
        let _guard = self.refresh_lock.lock().await;

        let Some(current) = self.tokens() else {
            tracing::debug!("Unauthorized without a refresh token");
            return Ok(false);
        };

        if stale != Some(current.access_token.as_str()) {
            tracing::debug!("Access token already replaced by a concurrent refresh");
            return Ok(true);
        }

        let refreshed = match self.refresh(&current.refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed; ending session");
                self.invalidate().await;
                return Err(ApiError::SessionExpired);
            }
        };

        self.replace_tokens(Some(refreshed.clone()));
        if let Err(e) = self.sink.on_tokens_refreshed(&refreshed).await {
            tracing::warn!(error = %e, "Could not persist refreshed tokens; ending session");
            self.invalidate().await;
            return Err(ApiError::SessionExpired);
        }

        tracing::info!("Access token refreshed");
        Ok(true)
    }

    /// The dedicated refresh call. Never carries an Authorization header.
    async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let response = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        Envelope::<TokenPair>::from_slice(&body)?.into_result()
    }

    async fn invalidate(&self) {
        self.clear_auth();
        self.sink.on_session_invalidated().await;
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<Envelope<T>> {
    let status = response.status();
    let body = response.bytes().await?;

    match Envelope::from_slice(&body) {
        Ok(envelope) => Ok(envelope),
        Err(e) if status.is_success() => Err(ApiError::Decode(e)),
        Err(_) => Err(ApiError::Http {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}

/// Final `401`: keeps the server's message when the body is an envelope.
async fn unauthorized(response: Response) -> ApiError {
    let message = match response.bytes().await {
        Ok(body) => match Envelope::<Value>::from_slice(&body) {
            Ok(Envelope::Failure { error }) => error,
            _ => None,
        },
        Err(e) => {
            tracing::debug!(error = %e, "Could not read 401 body");
            None
        }
    };
    ApiError::Unauthorized { message }
}
