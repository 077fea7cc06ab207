//! HTTP client types for Halo API communication.
//!
//! This module provides the authenticated request layer: a request descriptor,
//! the dispatcher that attaches and renews the bearer token, and the typed
//! errors a call can end in.
//!
//! # Overview
//!
//! - [`HaloClient`]: The async authenticated client
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A validated raw response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`ResponseError`]: Classification of non-success responses
//! - [`HttpError`]: Everything a call can fail with
//!
//! # Example
//!
//! ```rust,ignore
//! use cphalo::{HaloClient, HaloConfig};
//! use cphalo::clients::{HttpMethod, HttpRequest};
//!
//! let client = HaloClient::new(HaloConfig::from_env()?)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "servers")
//!     .query_param("state", "active")
//!     .build()?;
//!
//! let servers: serde_json::Value = client.execute(&request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **401 / 402 (token expired)**: The token is renewed and the same request
//!   is sent again, within the configured authentication attempt budget
//! - **429, 5xx and other errors**: Returned immediately as [`ResponseError`]
//! - **Transport failures**: Returned immediately, never retried

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod response_error;

pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HaloClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use response_error::{FieldError, ResponseError};
