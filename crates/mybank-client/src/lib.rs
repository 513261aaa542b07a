//! # mybank-client
//!
//! Authenticated client for the MyBank personal-finance REST API.
//!
//! The backend wraps every response in a uniform envelope
//! (`{success, data?, error?}`) and authorizes calls with short-lived JWT
//! bearer tokens. This crate owns the client side of that contract:
//!
//! - [`client`] - HTTP client with bearer stamping and silent refresh-on-401
//! - [`envelope`] - The success/failure wire wrapper
//! - [`session`] - Explicit session context: user state, navigation, token sink
//! - [`store`] - Durable token storage (file-backed or in-memory)
//! - [`auth`] - Login, registration, social login, logout and session restore
//! - [`api`] - Typed bindings for the asset, analytics, payment and investment endpoints
//! - [`models`] - Request and response payloads
//! - [`validation`] - Client-side input checks performed before submission
//! - [`format`] - Display helpers for amounts and timestamps
//! - [`config`] - Client configuration (file + environment overrides)
//!
//! ## Refresh protocol
//!
//! When a call comes back with `401 Unauthorized`, the client exchanges the
//! refresh token for a new pair exactly once and re-issues the original
//! request. If the refresh itself fails the session is torn down through the
//! injected [`SessionSink`] and the caller receives
//! [`ApiError::SessionExpired`]. Login, registration, social login and
//! refresh are sent anonymously and stay out of the protocol.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod format;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;

pub use api::{AnalyticsApi, AssetApi, AuthApi, InvestmentApi, PaymentApi};
pub use auth::AuthService;
pub use client::{ApiClient, ApiRequest};
pub use config::{ClientConfig, ConfigError, load_config};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};
pub use session::{Navigator, Route, RouteTracker, Session, SessionSink, SessionState, SessionStore};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TokenPair, TokenStore};
pub use validation::ValidationError;
