//! Error types for the CPHalo API client.
//!
//! This module contains the error type used when building and validating
//! client configuration.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use cphalo::{AppKey, ConfigError};
//!
//! let result = AppKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAppKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant provides a clear, actionable error message. Secret values are
/// never included in any message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Application key cannot be empty.
    #[error("Application key cannot be empty. Please provide a valid Halo API key id.")]
    EmptyAppKey,

    /// Application secret cannot be empty.
    #[error("Application secret cannot be empty. Please provide a valid Halo API secret key.")]
    EmptyAppSecret,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide an http(s) URL with a host (e.g., 'https://api.cloudpassage.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// API version segment is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'v' followed by digits (e.g., 'v1').")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// The authentication attempt budget must allow at least one attempt.
    #[error("Maximum authentication attempts must be at least 1.")]
    InvalidMaxAuthAttempts,

    /// The request timeout must be non-zero.
    #[error("Request timeout must be greater than zero.")]
    InvalidTimeout,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Environment variable '{name}' has an invalid value.")]
    InvalidEnvVar {
        /// The name of the offending variable.
        name: &'static str,
    },
}
