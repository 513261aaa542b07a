//! Refresh-on-401 behavior of the API client against a mock backend.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{
    Harness, asset_summary_json, client_for, ok, session_with, token_pair, unauthorized,
};
use mybank_client::models::{AssetSummary, User};
use mybank_client::{ApiError, Envelope, Route, StoreError, TokenPair, TokenStore};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const SUMMARY: &str = "/api/v1/asset/summary";
const REFRESH: &str = "/api/v1/auth/refresh";

#[tokio::test]
async fn test_refresh_and_retry_once() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(ok(token_pair("A2", "R2")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ok(asset_summary_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let envelope = h.client.assets().summary().await.unwrap();
    let summary = envelope.into_result().unwrap();
    assert_eq!(summary.total_balance, 1_500_000.0);
    assert_eq!(summary.assets.len(), 2);

    assert_eq!(h.client.tokens(), Some(TokenPair::new("A2", "R2")));
    assert_eq!(h.store.snapshot(), Some(TokenPair::new("A2", "R2")));

    let requests = h.server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == REFRESH)
        .expect("refresh request was sent");
    assert!(refresh.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_second_unauthorized_propagates() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ok(token_pair("A2", "R2")))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.server_message(), Some("Unauthorized"));

    // The refreshed pair is kept; only a failed refresh ends the session.
    assert_eq!(h.store.snapshot(), Some(TokenPair::new("A2", "R2")));
    assert!(h.client.is_authenticated());
}

#[tokio::test]
async fn test_no_refresh_without_tokens() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ok(token_pair("A2", "R2")))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.server_message(), Some("Unauthorized"));

    let requests = h.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_without_envelope_has_no_message() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { message: None }));
    assert_eq!(
        err.user_message(),
        mybank_client::error::SESSION_EXPIRED_MESSAGE
    );
}

#[tokio::test]
async fn test_refresh_failure_tears_down_session() {
    let h = Harness::authenticated("A1", "R1").await;
    h.session.state().set_user(serde_json::from_value::<User>(common::user_json()).unwrap());

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    assert!(err.is_session_expired());

    assert!(!h.client.is_authenticated());
    assert!(h.store.snapshot().is_none());
    assert!(!h.session.state().is_authenticated());
    assert!(h.session.state().user().is_none());
    assert_eq!(h.navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_rejected_refresh_envelope_tears_down_session() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "Refresh token revoked" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    assert!(matches!(err, ApiError::SessionExpired));
    assert!(h.store.snapshot().is_none());
    assert!(!h.client.is_authenticated());
}

#[tokio::test]
async fn test_concurrent_unauthorized_share_one_refresh() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("GET"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(unauthorized())
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ok(token_pair("A2", "R2")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ok(asset_summary_json()))
        .expect(3)
        .mount(&h.server)
        .await;

    let assets = h.client.assets();
    let (a, b, c) = tokio::join!(assets.summary(), assets.summary(), assets.summary());
    for result in [a, b, c] {
        assert!(result.unwrap().is_success());
    }
    assert_eq!(h.store.snapshot(), Some(TokenPair::new("A2", "R2")));
}

struct ReadOnlyStore;

#[async_trait]
impl TokenStore for ReadOnlyStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _tokens: &TokenPair) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_unpersistable_refresh_ends_session() {
    let server = wiremock::MockServer::start().await;
    let (session, navigator) = session_with(Arc::new(ReadOnlyStore));
    let client = client_for(&server.uri(), session.clone());
    client.set_auth("A1", "R1");
    session.navigate(Route::Dashboard);

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH))
        .respond_with(ok(token_pair("A2", "R2")))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get::<AssetSummary>(SUMMARY).await.unwrap_err();
    assert!(err.is_session_expired());
    assert!(!client.is_authenticated());
    assert_eq!(navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_clear_auth_is_idempotent() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(ok(asset_summary_json()))
        .mount(&h.server)
        .await;

    h.client.clear_auth();
    h.client.clear_auth();
    assert!(!h.client.is_authenticated());

    h.client.assets().summary().await.unwrap();
    let requests = h.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_application_failure_is_returned_as_envelope() {
    let h = Harness::authenticated("A1", "R1").await;

    Mock::given(method("POST"))
        .and(path("/api/v1/payment/transfer"))
        .respond_with(common::failure(400, "Insufficient balance"))
        .mount(&h.server)
        .await;

    let envelope: Envelope<serde_json::Value> = h
        .client
        .post("/api/v1/payment/transfer", &json!({ "amount": 1 }))
        .await
        .unwrap();
    assert_eq!(envelope.error_message(), Some("Insufficient balance"));

    let err = envelope.into_result().unwrap_err();
    assert_eq!(err.user_message(), "Insufficient balance");
    assert!(h.client.is_authenticated());
}

#[tokio::test]
async fn test_non_envelope_error_body() {
    let h = Harness::start().await;

    Mock::given(method("GET"))
        .and(path(SUMMARY))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&h.server)
        .await;

    let err = h.client.assets().summary().await.unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_error() {
    let (session, _) = session_with(Arc::new(mybank_client::MemoryTokenStore::new()));
    // Port 1 is reserved and refuses connections.
    let client = client_for("http://127.0.0.1:1", session);

    let err = client.assets().summary().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.user_message(), mybank_client::error::RETRY_MESSAGE);
}
