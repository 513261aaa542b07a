//! The uniform response wrapper.
//!
//! Every backend response body is either `{"success": true, "data": T}` or
//! `{"success": false, "error": "message"}`. A success envelope without a
//! `data` field decodes `T` from JSON `null`, which covers endpoints that
//! return nothing (`T = ()`) or an optional payload.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Decoded response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// `success: true` with the decoded payload.
    Success(T),
    /// `success: false` with the server message, if any.
    Failure {
        /// Message carried in the `error` field.
        error: Option<String>,
    },
}

#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes an envelope from a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let raw: RawEnvelope = serde_json::from_slice(body)?;
        if raw.success {
            serde_json::from_value(raw.data).map(Envelope::Success)
        } else {
            Ok(Envelope::Failure { error: raw.error })
        }
    }
}

impl<T> Envelope<T> {
    /// Returns `true` for a `success: true` envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrows the payload of a success envelope.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The server message of a failure envelope.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => error.as_deref(),
        }
    }

    /// Maps the payload of a success envelope.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Self::Success(data) => Envelope::Success(f(data)),
            Self::Failure { error } => Envelope::Failure { error },
        }
    }

    /// Converts a failure envelope into [`ApiError::Application`].
    pub fn into_result(self) -> ApiResult<T> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure { error } => Err(ApiError::application(error)),
        }
    }
}
