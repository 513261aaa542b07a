//! Client error types.
//!
//! Errors fall into two tiers. Transport failures mean no response was
//! received at all; application failures mean the server answered with a
//! `success: false` envelope. Authorization failures are handled by the
//! refresh protocol and only surface here once it has given up.

use crate::store::StoreError;
use crate::validation::ValidationError;

/// Shown when the request never reached the server or the connection broke.
pub const RETRY_MESSAGE: &str = "Network error. Please check your connection and try again.";

/// Shown when the server rejected a request without saying why.
pub const FALLBACK_MESSAGE: &str = "The request could not be completed. Please try again.";

/// Shown once a refresh attempt has failed and the session was cleared.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Errors returned by [`ApiClient`](crate::ApiClient) and the services built on it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout, TLS...).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a `success: false` envelope.
    #[error("Request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Application {
        /// Server-provided message, already localized server-side.
        message: Option<String>,
    },

    /// Authorization failed and no refresh could be attempted, the request
    /// had already been retried once, or it carried credentials of its own.
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized {
        /// Message from the `401` envelope, if the body was one.
        message: Option<String>,
    },

    /// Token refresh failed; the session has been torn down.
    #[error("Session expired")]
    SessionExpired,

    /// Non-success status whose body is not an envelope.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A success response whose body is not a valid envelope for the expected payload.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request body could not be serialized to JSON.
    #[error("Could not encode request body: {0}")]
    Encode(serde_json::Error),

    /// Client-side validation rejected the input before anything was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Durable token storage could not be read or written.
    #[error("Token storage error: {0}")]
    Storage(#[from] StoreError),

    /// A URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenience alias used throughout the crate.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates an application-level error from an optional server message.
    pub fn application(message: Option<String>) -> Self {
        Self::Application { message }
    }

    /// Returns `true` if no response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the error ended the current session.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Creates an authorization error from an optional server message.
    pub fn unauthorized(message: Option<String>) -> Self {
        Self::Unauthorized { message }
    }

    /// The server-provided message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Application { message } | Self::Unauthorized { message } => message
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Text suitable for showing to the user.
    ///
    /// Server messages are passed through verbatim; a blank or missing
    /// message falls back to a generic one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => RETRY_MESSAGE.to_string(),
            Self::Application { .. } => {
                self.server_message().unwrap_or(FALLBACK_MESSAGE).to_string()
            }
            Self::Unauthorized { .. } => self
                .server_message()
                .unwrap_or(SESSION_EXPIRED_MESSAGE)
                .to_string(),
            Self::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Validation(e) => e.message.to_string(),
            Self::Http { .. } | Self::Decode(_) | Self::Encode(_) => FALLBACK_MESSAGE.to_string(),
            Self::Storage(e) => format!("Could not access stored credentials: {e}"),
            Self::InvalidUrl(e) => format!("Invalid URL: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_message_is_verbatim() {
        let err = ApiError::application(Some("잔액이 부족합니다".to_string()));
        assert_eq!(err.user_message(), "잔액이 부족합니다");
    }

    #[test]
    fn test_application_message_fallback() {
        assert_eq!(ApiError::application(None).user_message(), FALLBACK_MESSAGE);
        assert_eq!(
            ApiError::application(Some("   ".to_string())).user_message(),
            FALLBACK_MESSAGE
        );
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Http {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");

        let err = ApiError::application(Some("Invalid credentials".to_string()));
        assert_eq!(err.to_string(), "Request rejected: Invalid credentials");

        let err = ApiError::application(None);
        assert_eq!(err.to_string(), "Request rejected: no message");
    }

    #[test]
    fn test_session_errors_share_message() {
        assert_eq!(ApiError::SessionExpired.user_message(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(ApiError::unauthorized(None).user_message(), SESSION_EXPIRED_MESSAGE);
        assert!(ApiError::SessionExpired.is_session_expired());
        assert!(!ApiError::unauthorized(None).is_transport());
    }

    #[test]
    fn test_unauthorized_message_is_verbatim() {
        let message = "이메일 또는 비밀번호가 올바르지 않습니다.";
        let err = ApiError::unauthorized(Some(message.to_string()));
        assert_eq!(err.user_message(), message);
        assert!(!err.is_session_expired());

        let err = ApiError::unauthorized(Some(" ".to_string()));
        assert_eq!(err.user_message(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(err.server_message(), None);
    }
}
