//! Client-credentials exchange for Halo bearer tokens.
//!
//! The Halo API issues short-lived bearer tokens in exchange for an
//! application key/secret pair presented with HTTP Basic authentication:
//!
//! ```text
//! POST {base_url}/oauth/access_token?grant_type=client_credentials
//! Authorization: Basic base64(app_key:app_secret)
//! ```
//!
//! A successful response carries `{"access_token", "token_type", "expires_in"}`.
//! Only `access_token` is used; expiry is detected reactively by the
//! dispatcher, so `expires_in` never schedules anything.
//!
//! This module performs the round trip only. Storing the returned token is the
//! caller's job.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;

use crate::auth::AuthError;
use crate::config::HaloConfig;

/// Grant type for client credentials.
const CLIENT_CREDENTIALS_GRANT_TYPE: &str = "client_credentials";

/// Token endpoint path relative to the base URL. It is not versioned.
const ACCESS_TOKEN_PATH: &str = "/oauth/access_token";

/// Longest error body kept in [`AuthError::RequestFailed`].
const MAX_BODY_SNIPPET: usize = 512;

/// Successful token endpoint response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AccessTokenResponse {
    /// The bearer token.
    pub access_token: String,
    /// Token type reported by the server (typically `bearer`).
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds reported by the server.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Returns the full token endpoint URL for a configuration.
#[must_use]
pub fn access_token_url(config: &HaloConfig) -> String {
    format!(
        "{}{ACCESS_TOKEN_PATH}?grant_type={CLIENT_CREDENTIALS_GRANT_TYPE}",
        config.base_url()
    )
}

/// Builds the `Authorization` header value for the credential exchange.
fn basic_authorization(config: &HaloConfig) -> String {
    let pair = format!(
        "{}:{}",
        config.app_key().as_ref(),
        config.app_secret().as_ref()
    );
    format!("Basic {}", STANDARD.encode(pair))
}

/// Exchanges the configured application key/secret for a bearer token.
///
/// Sends a single request with no body. The client passed in carries the
/// per round trip timeout.
///
/// # Errors
///
/// - [`AuthError::InvalidCredentials`] on `401 Unauthorized`
/// - [`AuthError::RequestFailed`] on any other non-2xx status
/// - [`AuthError::Network`] if no response was received
/// - [`AuthError::InvalidResponse`] if a 2xx body is not a token object
/// - [`AuthError::EmptyAccessToken`] if the token is an empty string
pub async fn renew_access_token(
    client: &reqwest::Client,
    config: &HaloConfig,
) -> Result<String, AuthError> {
    let url = access_token_url(config);
    tracing::info!("Requesting Halo access token from {}", url);

    let response = client
        .post(&url)
        .header(reqwest::header::AUTHORIZATION, basic_authorization(config))
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.bytes().await?;

    if status == 401 {
        return Err(AuthError::InvalidCredentials);
    }

    if !(200..=299).contains(&status) {
        return Err(AuthError::RequestFailed {
            status,
            message: body_snippet(&body),
        });
    }

    let token: AccessTokenResponse = serde_json::from_slice(&body)
        .map_err(|source| AuthError::InvalidResponse { status, source })?;

    if token.access_token.is_empty() {
        return Err(AuthError::EmptyAccessToken { status });
    }

    tracing::debug!(
        "Obtained Halo access token (type: {}, expires_in: {:?})",
        token.token_type.as_deref().unwrap_or("unknown"),
        token.expires_in
    );

    Ok(token.access_token)
}

/// Lossy UTF-8 body text cut to [`MAX_BODY_SNIPPET`] bytes on a char boundary.
fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX_BODY_SNIPPET {
        return text.into_owned();
    }
    let mut end = MAX_BODY_SNIPPET;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
