//! # CPHalo API Rust Client
//!
//! A Rust client for the CloudPassage Halo REST API, providing type-safe
//! configuration, automatic bearer token management, and typed error
//! classification.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`HaloConfig`] and [`HaloConfigBuilder`]
//! - Validated newtypes for credentials and endpoint values
//! - Client-credentials token exchange via [`auth::renew_access_token`]
//! - An authenticated async client that renews expired tokens within a
//!   bounded attempt budget
//! - Classification of error responses into [`ResponseError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use cphalo::{HaloConfig, AppKey, AppSecret, ApiVersion};
//!
//! let config = HaloConfig::builder()
//!     .app_key(AppKey::new("your-key-id").unwrap())
//!     .app_secret(AppSecret::new("your-secret").unwrap())
//!     .api_version(ApiVersion::default())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().as_ref(), "https://api.cloudpassage.com");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use cphalo::{HaloClient, HaloConfig};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Group {
//!     id: String,
//!     name: String,
//! }
//!
//! #[derive(Deserialize)]
//! struct GroupResponse {
//!     group: Group,
//! }
//!
//! // Reads HALO_APP_KEY, HALO_APP_SECRET and friends
//! let client = HaloClient::new(HaloConfig::from_env()?)?;
//!
//! // The first call exchanges credentials for a token
//! let created: GroupResponse = client
//!     .post("groups", &serde_json::json!({"group": {"name": "web"}}))
//!     .await?;
//!
//! client.delete(&format!("groups/{}", created.group.id)).await?;
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use cphalo::{HttpError, ResponseError};
//!
//! match client.get::<serde_json::Value>("servers/unknown", None).await {
//!     Err(HttpError::Response(ResponseError::NotFound { resource, value, .. })) => {
//!         println!("{resource} {value} does not exist");
//!     }
//!     Err(HttpError::Response(ResponseError::RateLimited)) => { /* back off */ }
//!     Err(e) if e.is_invalid_credentials() => { /* fix configuration */ }
//!     Err(e) => return Err(e.into()),
//!     Ok(server) => println!("{server}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Secrets stay secret**: Credentials and tokens are never logged

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{AppKey, AppSecret, ApiVersion, BaseUrl, HaloConfig, HaloConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    FieldError, HaloClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, ResponseError,
};

// Re-export authentication types
pub use auth::{renew_access_token, AuthError};
