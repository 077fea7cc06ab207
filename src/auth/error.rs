//! Credential exchange error types.
//!
//! # Error Types
//!
//! - [`AuthError::InvalidCredentials`]: The token endpoint rejected the key/secret pair
//! - [`AuthError::RequestFailed`]: The token endpoint answered with another non-2xx status
//! - [`AuthError::Network`]: The token request never produced a response
//! - [`AuthError::InvalidResponse`]: A 2xx answer that is not a token object
//! - [`AuthError::EmptyAccessToken`]: A 2xx answer carrying an empty token
//!
//! # Example
//!
//! ```rust
//! use cphalo::auth::AuthError;
//!
//! let error = AuthError::InvalidCredentials;
//! assert_eq!(error.to_string(), "invalid credentials");
//! assert_eq!(error.status_code(), Some(401));
//! ```

use thiserror::Error;

/// Errors that can occur while exchanging application credentials for a
/// bearer token.
///
/// [`AuthError::InvalidCredentials`] is terminal: retrying with the same
/// key/secret pair cannot succeed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint answered `401 Unauthorized`.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The token endpoint answered with a non-2xx status other than 401.
    #[error("token request failed with code {status}: {message}")]
    RequestFailed {
        /// The HTTP status code returned.
        status: u16,
        /// A snippet of the response body.
        message: String,
    },

    /// Network or connection error while contacting the token endpoint.
    #[error("token request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The token endpoint answered 2xx with a body that is not a token object.
    #[error("cannot decode token response with code {status}: {source}")]
    InvalidResponse {
        /// The HTTP status code returned.
        status: u16,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The token endpoint answered 2xx with an empty `access_token`.
    #[error("token response with code {status} carried an empty access token")]
    EmptyAccessToken {
        /// The HTTP status code returned.
        status: u16,
    },
}

impl AuthError {
    /// Returns the HTTP status code of the token endpoint response, if one
    /// was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials => Some(401),
            Self::RequestFailed { status, .. }
            | Self::InvalidResponse { status, .. }
            | Self::EmptyAccessToken { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

// Verify AuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_includes_status_and_body() {
        let error = AuthError::RequestFailed {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "token request failed with code 503: maintenance"
        );
        assert_eq!(error.status_code(), Some(503));
    }

    #[test]
    fn test_invalid_response_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let error = AuthError::InvalidResponse {
            status: 200,
            source,
        };
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.status_code(), Some(200));
    }
}
