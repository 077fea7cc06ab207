//! Configuration types for the CPHalo API client.
//!
//! This module provides the immutable configuration a [`HaloClient`] is built
//! from.
//!
//! # Overview
//!
//! - [`HaloConfig`]: The configuration struct holding all client settings
//! - [`HaloConfigBuilder`]: A builder for constructing [`HaloConfig`] instances
//! - [`AppKey`]: A validated application key newtype
//! - [`AppSecret`]: A validated application secret newtype with masked debug output
//! - [`BaseUrl`]: A validated base endpoint URL
//! - [`ApiVersion`]: The versioned path segment resource URLs live under
//!
//! # Example
//!
//! ```rust
//! use cphalo::{HaloConfig, AppKey, AppSecret};
//! use std::time::Duration;
//!
//! let config = HaloConfig::builder()
//!     .app_key(AppKey::new("my-key-id").unwrap())
//!     .app_secret(AppSecret::new("my-secret").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_auth_attempts(), 3);
//! ```
//!
//! [`HaloClient`]: crate::clients::HaloClient

mod newtypes;
mod version;

pub use newtypes::{AppKey, AppSecret, BaseUrl};
pub use version::ApiVersion;

use std::time::Duration;

use crate::error::ConfigError;

/// Production endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudpassage.com";

/// Per round trip network timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication attempt budget per logical call used when none is configured.
pub const DEFAULT_MAX_AUTH_ATTEMPTS: u32 = 3;

/// Configuration for the CPHalo API client.
///
/// All values are fixed at construction. The application key and secret are
/// only ever read by the credential exchange, which places them in the
/// `Authorization` header of that single request.
///
/// # Thread Safety
///
/// `HaloConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct HaloConfig {
    app_key: AppKey,
    app_secret: AppSecret,
    base_url: BaseUrl,
    api_version: ApiVersion,
    timeout: Duration,
    max_auth_attempts: u32,
    user_agent_prefix: Option<String>,
}

impl HaloConfig {
    /// Creates a new builder for constructing a `HaloConfig`.
    #[must_use]
    pub fn builder() -> HaloConfigBuilder {
        HaloConfigBuilder::new()
    }

    /// Builds a configuration from `HALO_*` environment variables.
    ///
    /// `HALO_APP_KEY` and `HALO_APP_SECRET` are required. `HALO_BASE_URL`,
    /// `HALO_API_VERSION`, `HALO_TIMEOUT_SECS` and `HALO_MAX_AUTH_ATTEMPTS`
    /// are optional and fall back to the builder defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] when a required variable
    /// is unset, [`ConfigError::InvalidEnvVar`] when a numeric variable does not
    /// parse, or any validation error from the underlying newtypes.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(key) = lookup("HALO_APP_KEY") {
            builder = builder.app_key(AppKey::new(key)?);
        }
        if let Some(secret) = lookup("HALO_APP_SECRET") {
            builder = builder.app_secret(AppSecret::new(secret)?);
        }
        if let Some(url) = lookup("HALO_BASE_URL") {
            builder = builder.base_url(BaseUrl::new(url)?);
        }
        if let Some(version) = lookup("HALO_API_VERSION") {
            builder = builder.api_version(version.parse()?);
        }
        if let Some(secs) = lookup("HALO_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "HALO_TIMEOUT_SECS",
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = lookup("HALO_MAX_AUTH_ATTEMPTS") {
            let attempts: u32 = attempts.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: "HALO_MAX_AUTH_ATTEMPTS",
            })?;
            builder = builder.max_auth_attempts(attempts);
        }

        builder.build()
    }

    /// Returns the application key.
    #[must_use]
    pub const fn app_key(&self) -> &AppKey {
        &self.app_key
    }

    /// Returns the application secret.
    #[must_use]
    pub const fn app_secret(&self) -> &AppSecret {
        &self.app_secret
    }

    /// Returns the base endpoint URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the API version segment.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the per round trip network timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the authentication attempt budget per logical call.
    #[must_use]
    pub const fn max_auth_attempts(&self) -> u32 {
        self.max_auth_attempts
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify HaloConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HaloConfig>();
};

/// Builder for constructing [`HaloConfig`] instances.
///
/// Required fields are `app_key` and `app_secret`.
///
/// # Defaults
///
/// - `base_url`: [`DEFAULT_BASE_URL`]
/// - `api_version`: `v1`
/// - `timeout`: 10 seconds
/// - `max_auth_attempts`: 3
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct HaloConfigBuilder {
    app_key: Option<AppKey>,
    app_secret: Option<AppSecret>,
    base_url: Option<BaseUrl>,
    api_version: Option<ApiVersion>,
    timeout: Option<Duration>,
    max_auth_attempts: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl HaloConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application key (required).
    #[must_use]
    pub fn app_key(mut self, key: AppKey) -> Self {
        self.app_key = Some(key);
        self
    }

    /// Sets the application secret (required).
    #[must_use]
    pub fn app_secret(mut self, secret: AppSecret) -> Self {
        self.app_secret = Some(secret);
        self
    }

    /// Sets the base endpoint URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API version segment.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Sets the network timeout applied to each HTTP round trip.
    ///
    /// A call that renews its token and retries may take several timeouts
    /// end to end.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets how many credential exchanges a single call may perform.
    #[must_use]
    pub const fn max_auth_attempts(mut self, attempts: u32) -> Self {
        self.max_auth_attempts = Some(attempts);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`HaloConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `app_key` or
    /// `app_secret` are not set, [`ConfigError::InvalidMaxAuthAttempts`] if the
    /// attempt budget is zero, or [`ConfigError::InvalidTimeout`] if the
    /// timeout is zero.
    pub fn build(self) -> Result<HaloConfig, ConfigError> {
        let app_key = self
            .app_key
            .ok_or(ConfigError::MissingRequiredField { field: "app_key" })?;
        let app_secret = self
            .app_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "app_secret",
            })?;

        let max_auth_attempts = self.max_auth_attempts.unwrap_or(DEFAULT_MAX_AUTH_ATTEMPTS);
        if max_auth_attempts == 0 {
            return Err(ConfigError::InvalidMaxAuthAttempts);
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => BaseUrl::new(DEFAULT_BASE_URL)?,
        };

        Ok(HaloConfig {
            app_key,
            app_secret,
            base_url,
            api_version: self.api_version.unwrap_or_default(),
            timeout,
            max_auth_attempts,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn minimal_builder() -> HaloConfigBuilder {
        HaloConfig::builder()
            .app_key(AppKey::new("key").unwrap())
            .app_secret(AppSecret::new("secret").unwrap())
    }

    #[test]
    fn test_builder_requires_app_key() {
        let result = HaloConfigBuilder::new()
            .app_secret(AppSecret::new("secret").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "app_key" })
        ));
    }

    #[test]
    fn test_builder_requires_app_secret() {
        let result = HaloConfigBuilder::new()
            .app_key(AppKey::new("key").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "app_secret"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = minimal_builder().build().unwrap();

        assert_eq!(config.base_url().as_ref(), DEFAULT_BASE_URL);
        assert_eq!(config.api_version().as_ref(), "v1");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.max_auth_attempts(), 3);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_zero_attempt_budget() {
        let result = minimal_builder().max_auth_attempts(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidMaxAuthAttempts)));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = minimal_builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_debug_output_does_not_leak_secret() {
        let config = HaloConfig::builder()
            .app_key(AppKey::new("key").unwrap())
            .app_secret(AppSecret::new("hunter2-secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("HaloConfig"));
        assert!(!debug_str.contains("hunter2-secret"));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = [
            ("HALO_APP_KEY", "env-key"),
            ("HALO_APP_SECRET", "env-secret"),
            ("HALO_BASE_URL", "https://halo.example.com/"),
            ("HALO_API_VERSION", "v2"),
            ("HALO_TIMEOUT_SECS", "25"),
            ("HALO_MAX_AUTH_ATTEMPTS", "5"),
        ]
        .into_iter()
        .collect();

        let config =
            HaloConfig::from_lookup(|name| vars.get(name).map(ToString::to_string)).unwrap();

        assert_eq!(config.app_key().as_ref(), "env-key");
        assert_eq!(config.base_url().as_ref(), "https://halo.example.com");
        assert_eq!(config.api_version().as_ref(), "v2");
        assert_eq!(config.timeout(), Duration::from_secs(25));
        assert_eq!(config.max_auth_attempts(), 5);
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let result = HaloConfig::from_lookup(|_| None);
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "app_key" })
        ));
    }

    #[test]
    fn test_from_lookup_rejects_unparsable_numbers() {
        let result = HaloConfig::from_lookup(|name| match name {
            "HALO_APP_KEY" => Some("k".to_string()),
            "HALO_APP_SECRET" => Some("s".to_string()),
            "HALO_MAX_AUTH_ATTEMPTS" => Some("three".to_string()),
            _ => None,
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar {
                name: "HALO_MAX_AUTH_ATTEMPTS"
            })
        ));
    }
}
