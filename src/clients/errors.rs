//! HTTP-specific error types for the CPHalo API client.
//!
//! # Error Handling
//!
//! - [`InvalidHttpRequestError`]: A request failed validation before it was sent
//! - [`HttpError`]: Everything an authenticated call can fail with
//!
//! Only the token expiry signal (401/402) is retried, by renewing the token.
//! Rate limiting and server errors surface immediately so callers can apply
//! their own backoff using [`HttpError::status_code`].
//!
//! # Example
//!
//! ```rust,ignore
//! use cphalo::clients::{HttpError, ResponseError};
//!
//! match client.get::<ServersResponse>("servers", None).await {
//!     Ok(servers) => println!("{} servers", servers.count),
//!     Err(HttpError::Response(ResponseError::RateLimited)) => {
//!         // back off and retry later
//!     }
//!     Err(HttpError::Response(ResponseError::NotFound { resource, .. })) => {
//!         println!("no such {resource}");
//!     }
//!     Err(e) if e.is_invalid_credentials() => {
//!         eprintln!("check HALO_APP_KEY / HALO_APP_SECRET");
//!     }
//!     Err(e) => eprintln!("request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::AuthError;
use crate::clients::response_error::ResponseError;

/// Error returned when an HTTP request fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The resource path is empty.
    #[error("Cannot build a request without a resource path.")]
    EmptyPath,

    /// A query parameter has an empty key.
    #[error("Query parameter keys cannot be empty.")]
    EmptyQueryKey,

    /// The request body could not be serialized to JSON.
    #[error("Cannot serialize request body: {reason}")]
    InvalidBody {
        /// The serializer's error message.
        reason: String,
    },
}

/// Unified error type for authenticated requests.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// No token was cached and the credential exchange failed.
    #[error("cannot set access token: {0}")]
    CannotSetToken(#[source] AuthError),

    /// The API signalled token expiry and the credential exchange failed.
    #[error("cannot renew access token: {0}")]
    CannotRenewToken(#[source] AuthError),

    /// The resource request never produced a response (connection, timeout).
    #[error("request execution failed: {0}")]
    RequestExecutionFailed(#[source] reqwest::Error),

    /// The authentication attempt budget for this call was exhausted.
    #[error("max tries exceeded after {attempts} authentication attempts")]
    MaxAttemptsExceeded {
        /// Number of credential exchanges performed by the call.
        attempts: u32,
        /// Status of the last expiry response, if any.
        status: Option<u16>,
    },

    /// The API answered with a classified non-success status.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The API answered with a non-success status and a body that is not JSON.
    #[error("cannot decode error response with code {status}: {source}")]
    ErrorBody {
        /// The HTTP status code.
        status: u16,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A successful response body does not decode into the requested type.
    #[error("cannot parse response with code {status}: {source}")]
    Decode {
        /// The HTTP status code.
        status: u16,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("cannot create HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.status_code()),
            Self::ErrorBody { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::MaxAttemptsExceeded { status, .. } => *status,
            Self::CannotSetToken(e) | Self::CannotRenewToken(e) => e.status_code(),
            Self::RequestExecutionFailed(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidRequest(_) | Self::ClientInit(_) => None,
        }
    }

    /// Returns `true` if the credential exchange rejected the application
    /// key/secret. Retrying cannot fix this.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(
            self,
            Self::CannotSetToken(AuthError::InvalidCredentials)
                | Self::CannotRenewToken(AuthError::InvalidCredentials)
        )
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
