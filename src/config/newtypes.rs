//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.
//!
//! Neither credential newtype implements `Serialize` or `Display`; the only
//! way to read the raw value is `AsRef<str>`, which the credential exchange uses
//! to build its `Authorization` header.

use crate::error::ConfigError;
use std::fmt;

/// A validated Halo application key (API key id).
///
/// # Example
///
/// ```rust
/// use cphalo::AppKey;
///
/// let key = AppKey::new("my-key-id").unwrap();
/// assert_eq!(key.as_ref(), "my-key-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppKey(String);

impl AppKey {
    /// Creates a new validated application key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAppKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyAppKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for AppKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Halo application secret.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `AppSecret(*****)` instead of the actual secret.
///
/// ```rust
/// use cphalo::AppSecret;
///
/// let secret = AppSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "AppSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);

impl AppSecret {
    /// Creates a new validated application secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAppSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyAppSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for AppSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(*****)")
    }
}

/// A validated base endpoint URL for the Halo API.
///
/// The URL must use the `http` or `https` scheme and carry a host. Trailing
/// slashes are removed so that paths can be joined with a single `/`.
///
/// # Example
///
/// ```rust
/// use cphalo::BaseUrl;
///
/// let url = BaseUrl::new("https://api.cloudpassage.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.cloudpassage.com");
/// assert_eq!(url.host_name(), "api.cloudpassage.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    host_start: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no `http`/`https`
    /// scheme, no host, or carries a query or fragment.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = url[..scheme_end].to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(invalid());
        }

        if url.contains(['?', '#']) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            host_start,
            host_end,
        })
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
