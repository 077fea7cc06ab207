//! Authenticated HTTP client for the Halo API.
//!
//! This module provides [`HaloClient`], which owns the cached bearer token,
//! attaches it to every request, renews it when the API reports expiry, and
//! turns non-success responses into typed errors.
//!
//! # Call Flow
//!
//! For every logical call, with an attempt counter starting at zero:
//!
//! 1. Fail with [`HttpError::MaxAttemptsExceeded`] once the counter reaches
//!    the configured budget.
//! 2. With no cached token, exchange credentials (counts one attempt). A
//!    failure surfaces as [`HttpError::CannotSetToken`].
//! 3. Send the request with `Authorization: Bearer {token}`. A transport
//!    failure surfaces as [`HttpError::RequestExecutionFailed`] and is never
//!    retried.
//! 4. On `401`/`402`, exchange credentials again (counts one attempt, failure
//!    surfaces as [`HttpError::CannotRenewToken`]) and go back to step 1 with
//!    the same request. If a concurrent call already replaced the rejected
//!    token, the exchange is skipped and costs nothing.
//! 5. Classify any other non-2xx status with [`ResponseError::classify`].
//! 6. Decode the body into the caller's type, if one was asked for.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::auth::renew_access_token;
use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::response_error::ResponseError;
use crate::config::HaloConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Authenticated client for the Halo REST API.
///
/// # Token Handling
///
/// The client starts without a token and obtains one on first use. The token
/// lives behind a mutex: a caller holds the lock while it checks for or
/// renews the token, so two concurrent renewals never interleave. The lock
/// is released before the resource request is sent.
///
/// There is no background refresh; renewal happens only when a call finds no
/// token or the API answers `401`/`402`.
///
/// # Thread Safety
///
/// `HaloClient` is `Send + Sync`; share it across tasks with an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use cphalo::{HaloClient, HaloConfig, AppKey, AppSecret};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct ServerList {
///     count: u64,
/// }
///
/// let config = HaloConfig::builder()
///     .app_key(AppKey::new("key-id").unwrap())
///     .app_secret(AppSecret::new("secret").unwrap())
///     .build()
///     .unwrap();
///
/// let client = HaloClient::new(config)?;
/// let servers: ServerList = client.get("servers", None).await?;
/// println!("{} servers", servers.count);
/// ```
pub struct HaloClient {
    /// Immutable client configuration.
    config: HaloConfig,
    /// The internal reqwest HTTP client, carrying the per round trip timeout.
    client: reqwest::Client,
    /// Value sent in the `User-Agent` header.
    user_agent: String,
    /// The cached bearer token.
    token: Mutex<Option<String>>,
}

impl fmt::Debug for HaloClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HaloClient")
            .field("config", &self.config)
            .field("user_agent", &self.user_agent)
            .field("token", &"*****")
            .finish_non_exhaustive()
    }
}

// Verify HaloClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HaloClient>();
};

impl HaloClient {
    /// Creates a new client. No network I/O happens until the first call.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientInit`] if the underlying HTTP client cannot
    /// be created (e.g. TLS initialization failure).
    pub fn new(config: HaloConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .build()
            .map_err(HttpError::ClientInit)?;

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}CPHalo API Library v{SDK_VERSION} | Rust {rust_version}");

        Ok(Self {
            config,
            client,
            user_agent,
            token: Mutex::new(None),
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &HaloConfig {
        &self.config
    }

    /// Returns the `User-Agent` header value sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns `true` if a bearer token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Exchanges credentials for a fresh token and caches it, replacing any
    /// previous one.
    ///
    /// Calls renew on their own when needed; this is for warming the client
    /// up or validating credentials at startup.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::CannotRenewToken`] if the exchange fails.
    pub async fn renew_token(&self) -> Result<(), HttpError> {
        let mut cached = self.token.lock().await;
        let token = renew_access_token(&self.client, &self.config)
            .await
            .map_err(HttpError::CannotRenewToken)?;
        *cached = Some(token);
        Ok(())
    }

    /// Sends an authenticated request and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the request is invalid, the token cannot be
    /// obtained, the attempt budget runs out, the transport fails, the API
    /// answers with a non-success status, or the body does not decode into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: &HttpRequest) -> Result<T, HttpError> {
        let response = self.send(request).await?;
        response.json().map_err(|source| HttpError::Decode {
            status: response.code,
            source,
        })
    }

    /// Sends an authenticated request whose response body is not needed.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), minus body decoding.
    pub async fn execute_no_content(&self, request: &HttpRequest) -> Result<(), HttpError> {
        self.send(request).await.map(|_| ())
    }

    /// Sends an authenticated request and returns the validated raw response.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), minus body decoding.
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = request.url(self.config.base_url(), self.config.api_version());
        let body = request.body.as_ref().map(ToString::to_string);
        let max_attempts = self.config.max_auth_attempts();

        let mut attempts: u32 = 0;
        let mut expired_status: Option<u16> = None;

        loop {
            if attempts >= max_attempts {
                tracing::warn!(
                    "Giving up on {} {} after {} authentication attempts",
                    request.http_method,
                    url,
                    attempts
                );
                return Err(HttpError::MaxAttemptsExceeded {
                    attempts,
                    status: expired_status,
                });
            }

            let token = self.cached_or_new_token(&mut attempts).await?;
            let response = self
                .send_once(request.http_method, &url, body.as_deref(), &token)
                .await?;

            if response.is_token_expired() {
                tracing::warn!(
                    "Access token expired ({}) on {} {}, renewing",
                    response.code,
                    request.http_method,
                    url
                );
                expired_status = Some(response.code);
                if attempts < max_attempts && self.renew_expired_token(&token).await? {
                    attempts += 1;
                }
                continue;
            }

            return match ResponseError::classify(response.code, &response.body) {
                Ok(None) => Ok(response),
                Ok(Some(error)) => {
                    tracing::debug!("{} {} failed: {}", request.http_method, url, error);
                    Err(HttpError::Response(error))
                }
                Err(source) => Err(HttpError::ErrorBody {
                    status: response.code,
                    source,
                }),
            };
        }
    }

    /// Sends a GET request and decodes the response.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<BTreeMap<String, String>>,
    ) -> Result<T, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Get, path)
            .query(query.unwrap_or_default())
            .build()?;
        self.execute(&request).await
    }

    /// Sends a POST request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .build()?;
        self.execute(&request).await
    }

    /// Sends a PUT request with a JSON body and decodes the response.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(body)
            .build()?;
        self.execute(&request).await
    }

    /// Sends a DELETE request, ignoring the response body.
    ///
    /// # Errors
    ///
    /// See [`execute_no_content`](Self::execute_no_content).
    pub async fn delete(&self, path: &str) -> Result<(), HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path).build()?;
        self.execute_no_content(&request).await
    }

    /// Returns the cached token, exchanging credentials first if there is none.
    async fn cached_or_new_token(&self, attempts: &mut u32) -> Result<String, HttpError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        tracing::debug!("No access token cached, authenticating");
        *attempts += 1;
        let token = renew_access_token(&self.client, &self.config)
            .await
            .map_err(HttpError::CannotSetToken)?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Replaces `expired` with a fresh token, unless another caller already
    /// replaced it while this one waited for the lock.
    ///
    /// Returns `true` if a credential exchange was performed.
    async fn renew_expired_token(&self, expired: &str) -> Result<bool, HttpError> {
        let mut cached = self.token.lock().await;
        if cached.as_deref().is_some_and(|current| current != expired) {
            tracing::debug!("Access token already renewed by a concurrent call");
            return Ok(false);
        }

        let token = renew_access_token(&self.client, &self.config)
            .await
            .map_err(HttpError::CannotRenewToken)?;
        *cached = Some(token);
        Ok(true)
    }

    /// Performs a single round trip.
    async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&str>,
        token: &str,
    ) -> Result<HttpResponse, HttpError> {
        tracing::debug!("Making {} request to {}", method, url);

        let mut req_builder = self
            .client
            .request(method.into(), url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token);

        if let Some(body) = body {
            tracing::trace!("Request body: {}", body);
            req_builder = req_builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let res = req_builder
            .send()
            .await
            .map_err(HttpError::RequestExecutionFailed)?;

        let code = res.status().as_u16();
        let headers = HttpResponse::collect_headers(res.headers());
        let body = res
            .bytes()
            .await
            .map_err(HttpError::RequestExecutionFailed)?;

        tracing::debug!("Received {} from {} {}", code, method, url);

        Ok(HttpResponse::new(code, headers, body.to_vec()))
    }
}
