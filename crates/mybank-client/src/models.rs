//! Request and response payloads exchanged with the MyBank API.
//!
//! Field names follow the backend's camelCase wire format. Monetary amounts
//! are plain JSON numbers in KRW.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

/// Registration input as entered by the user, including the confirmation
/// field that never leaves the client.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Response to login, registration and social login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response to a token refresh; the same shape as the stored pair.
pub type TokenResponse = crate::store::TokenPair;

/// Authorization code returned by the social login provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLoginRequest {
    pub code: String,
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Bank,
    Card,
    Securities,
    Insurance,
    Loan,
    Point,
    #[serde(other)]
    Other,
}

impl AssetType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bank => "Bank",
            Self::Card => "Card",
            Self::Securities => "Securities",
            Self::Insurance => "Insurance",
            Self::Loan => "Loan",
            Self::Point => "Points",
            Self::Other => "Other",
        }
    }
}

/// A linked financial account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub asset_type: AssetType,
    pub institution_name: String,
    pub account_name: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub current_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCategory {
    pub asset_type: AssetType,
    pub total_value: f64,
    pub count: u32,
}

/// Dashboard aggregate over all linked accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub total_balance: f64,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub category_breakdown: Vec<AssetCategory>,
}

impl AssetSummary {
    /// Accounts of the given type, in server order.
    pub fn accounts_of(&self, asset_type: AssetType) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(move |a| a.asset_type == asset_type)
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
    pub transaction_count: u32,
    pub average_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnalysis {
    pub total_spending: f64,
    /// Human-readable period label, e.g. `2024-01-08 ~ 2024-01-15`.
    pub period: String,
    #[serde(default)]
    pub category_breakdown: Vec<CategorySpending>,
}

impl SpendingAnalysis {
    /// Sum of the per-category amounts.
    pub fn breakdown_total(&self) -> f64 {
        self.category_breakdown.iter().map(|c| c.amount).sum()
    }

    /// Whether the breakdown adds up to the reported total once both are
    /// rounded to whole won, as they are when displayed.
    pub fn breakdown_matches_total(&self) -> bool {
        (self.breakdown_total().round() - self.total_spending.round()).abs() < 0.5
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub recipient_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    pub recipient_name: String,
    pub amount: f64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentHistory {
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// Pagination for the payment history endpoint. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvestmentType {
    #[serde(rename = "ROUNDUP")]
    RoundUp,
    Manual,
    Auto,
}

impl InvestmentType {
    pub fn label(self) -> &'static str {
        match self {
            Self::RoundUp => "Round-up Savings",
            Self::Manual => "Manual Investment",
            Self::Auto => "Auto Investment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub investment_id: String,
    pub product_name: String,
    pub investment_type: InvestmentType,
    pub amount: f64,
    pub invested_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub total_invested: f64,
    pub total_rounded_up: f64,
    pub total_round_up_transactions: u32,
    #[serde(default)]
    pub recent_investments: Vec<Investment>,
}
