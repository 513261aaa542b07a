//! Shared fixtures for the mock-server tests.

#![allow(dead_code)]

use std::sync::Arc;

use mybank_client::config::{ApiConfig, OAuthConfig};
use mybank_client::{
    ApiClient, AuthService, MemoryTokenStore, RouteTracker, Session, TokenPair, TokenStore,
};
use serde_json::{Value, json};
use wiremock::{MockServer, ResponseTemplate};

pub struct Harness {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<RouteTracker>,
    pub session: Arc<Session>,
    pub client: Arc<ApiClient>,
}

impl Harness {
    /// Fresh harness with nothing persisted and no tokens on the client.
    pub async fn start() -> Self {
        Self::with_store(Arc::new(MemoryTokenStore::new())).await
    }

    /// Harness whose store and client both hold `(access, refresh)`.
    pub async fn authenticated(access: &str, refresh: &str) -> Self {
        let harness =
            Self::with_store(Arc::new(MemoryTokenStore::with_tokens(TokenPair::new(
                access, refresh,
            ))))
            .await;
        harness.client.set_auth(access, refresh);
        harness
    }

    pub async fn with_store(store: Arc<MemoryTokenStore>) -> Self {
        let server = MockServer::start().await;
        let navigator = Arc::new(RouteTracker::new());
        let session = Arc::new(Session::new(store.clone(), navigator.clone()));
        let client = Arc::new(client_for(&server.uri(), session.clone()));
        Self {
            server,
            store,
            navigator,
            session,
            client,
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.client.clone(),
            self.session.clone(),
            OAuthConfig::default(),
        )
    }
}

pub fn client_for(base_url: &str, session: Arc<Session>) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        ..ApiConfig::default()
    };
    ApiClient::new(&config, session).expect("Failed to create API client")
}

pub fn session_with(store: Arc<dyn TokenStore>) -> (Arc<Session>, Arc<RouteTracker>) {
    let navigator = Arc::new(RouteTracker::new());
    (Arc::new(Session::new(store, navigator.clone())), navigator)
}

/// `200` with a success envelope around `data`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// `status` with a failure envelope.
pub fn failure(status: u16, error: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "success": false, "error": error }))
}

pub fn unauthorized() -> ResponseTemplate {
    failure(401, "Unauthorized")
}

pub fn token_pair(access: &str, refresh: &str) -> Value {
    json!({ "accessToken": access, "refreshToken": refresh })
}

pub fn user_json() -> Value {
    json!({
        "id": "user-123",
        "email": "test@mybank.com",
        "name": "Test User",
        "phoneNumber": "01012345678"
    })
}

pub fn login_response(access: &str, refresh: &str) -> Value {
    json!({ "accessToken": access, "refreshToken": refresh, "user": user_json() })
}

pub fn asset_summary_json() -> Value {
    json!({
        "totalBalance": 1500000,
        "assets": [
            {"id": "a1", "assetType": "BANK", "institutionName": "KB Kookmin",
             "accountName": "Salary", "balance": 1000000, "currentValue": 1000000},
            {"id": "a2", "assetType": "CARD", "institutionName": "Shinhan Card",
             "accountName": "Deep Dream", "balance": 500000, "currentValue": 500000}
        ],
        "categoryBreakdown": [
            {"assetType": "BANK", "totalValue": 1000000, "count": 1},
            {"assetType": "CARD", "totalValue": 500000, "count": 1}
        ]
    })
}
