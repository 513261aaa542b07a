//! Typed endpoint bindings.
//!
//! Each binding borrows the [`ApiClient`] and returns the decoded
//! [`Envelope`], so callers decide how to treat a `success: false` answer.
//! Authorization and refresh are handled by the client underneath, except
//! for the credential exchanges in [`AuthApi`], which are sent anonymously so
//! that a rejected password or code never touches the current session.

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ApiResult;
use crate::models::{
    AssetSummary, InvestmentSummary, LoginRequest, LoginResponse, PageRequest, Payment,
    PaymentHistory, RefreshRequest, RegisterRequest, SocialLoginRequest, SpendingAnalysis,
    TokenResponse, TransferRequest, User,
};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
pub const CURRENT_USER_PATH: &str = "/api/v1/user/me";
pub const SOCIAL_LOGIN_PATH: &str = "/api/v1/auth/kakao/callback";

pub const ASSET_SUMMARY_PATH: &str = "/api/v1/asset/summary";
pub const ASSET_SYNC_PATH: &str = "/api/v1/asset/sync";

pub const SPENDING_PATH: &str = "/api/v1/analytics/spending";

/// Lookback window used when none is given.
pub const DEFAULT_DAYS_BACK: u32 = 30;

pub const TRANSFER_PATH: &str = "/api/v1/payment/transfer";
pub const PAYMENT_HISTORY_PATH: &str = "/api/v1/payment/history";

pub const INVEST_SUMMARY_PATH: &str = "/api/v1/invest/summary";

fn payment_path(payment_id: &str) -> String {
    format!("/api/v1/payment/{payment_id}")
}

fn round_up_path(action: &str, account_id: &str) -> String {
    format!("/api/v1/invest/roundup/{action}/{account_id}")
}

/// Authentication endpoints.
#[derive(Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<Envelope<LoginResponse>> {
        self.exchange(LOGIN_PATH, request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Envelope<LoginResponse>> {
        self.exchange(REGISTER_PATH, request).await
    }

    pub async fn logout(&self) -> ApiResult<Envelope<()>> {
        self.client.post_empty(LOGOUT_PATH).await
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The client's own recovery uses a separate call; this binding exists
    /// for callers that want to rotate tokens proactively.
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<Envelope<TokenResponse>> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.exchange(crate::client::REFRESH_PATH, &body).await
    }

    pub async fn current_user(&self) -> ApiResult<Envelope<User>> {
        self.client.get(CURRENT_USER_PATH).await
    }

    /// Completes the social login redirect flow with the provider's code.
    pub async fn social_login(&self, code: &str) -> ApiResult<Envelope<LoginResponse>> {
        let body = SocialLoginRequest {
            code: code.to_string(),
        };
        self.exchange(SOCIAL_LOGIN_PATH, &body).await
    }

    async fn exchange<T, B>(&self, path: &str, body: &B) -> ApiResult<Envelope<T>>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let request = ApiRequest::post(path).json(body)?.anonymous();
        self.client.send(&request).await
    }
}

/// Linked-account endpoints.
#[derive(Clone, Copy)]
pub struct AssetApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AssetApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> ApiResult<Envelope<AssetSummary>> {
        self.client.get(ASSET_SUMMARY_PATH).await
    }

    /// Asks the server to pull fresh balances from every institution.
    pub async fn sync(&self) -> ApiResult<Envelope<()>> {
        self.client.post_empty(ASSET_SYNC_PATH).await
    }
}

#[derive(Clone, Copy)]
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalyticsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Spending over the last `days_back` days ([`DEFAULT_DAYS_BACK`] when `None`).
    pub async fn spending(&self, days_back: Option<u32>) -> ApiResult<Envelope<SpendingAnalysis>> {
        let request =
            ApiRequest::get(SPENDING_PATH).query("daysBack", days_back.unwrap_or(DEFAULT_DAYS_BACK));
        self.client.send(&request).await
    }
}

#[derive(Clone, Copy)]
pub struct PaymentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn transfer(&self, request: &TransferRequest) -> ApiResult<Envelope<Payment>> {
        self.client.post(TRANSFER_PATH, request).await
    }

    pub async fn payment(&self, payment_id: &str) -> ApiResult<Envelope<Payment>> {
        self.client.get(&payment_path(payment_id)).await
    }

    pub async fn history(&self, page: PageRequest) -> ApiResult<Envelope<PaymentHistory>> {
        let request = ApiRequest::get(PAYMENT_HISTORY_PATH)
            .query("page", page.page)
            .query("size", page.size);
        self.client.send(&request).await
    }
}

#[derive(Clone, Copy)]
pub struct InvestmentApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InvestmentApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn summary(&self) -> ApiResult<Envelope<InvestmentSummary>> {
        self.client.get(INVEST_SUMMARY_PATH).await
    }

    pub async fn enable_round_up(&self, account_id: &str) -> ApiResult<Envelope<()>> {
        self.client
            .post_empty(&round_up_path("enable", account_id))
            .await
    }

    pub async fn disable_round_up(&self, account_id: &str) -> ApiResult<Envelope<()>> {
        self.client
            .post_empty(&round_up_path("disable", account_id))
            .await
    }
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn assets(&self) -> AssetApi<'_> {
        AssetApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    pub fn payments(&self) -> PaymentApi<'_> {
        PaymentApi::new(self)
    }

    pub fn investments(&self) -> InvestmentApi<'_> {
        InvestmentApi::new(self)
    }
}
