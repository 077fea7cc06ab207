//! HTTP request types for the CPHalo API client.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder. A
//! descriptor is pure data: building one performs no I/O, and the same
//! descriptor is replayed unchanged when the client retries after renewing
//! its token.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::clients::errors::InvalidHttpRequestError;
use crate::config::{ApiVersion, BaseUrl};

/// HTTP methods supported by the Halo API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An HTTP request to be sent to the Halo API.
///
/// The path is relative to the versioned API root, e.g. `servers` or
/// `firewall_policies/{id}/firewall_rules`.
///
/// # Example
///
/// ```rust
/// use cphalo::clients::{HttpRequest, HttpMethod};
/// use cphalo::{ApiVersion, BaseUrl};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "servers")
///     .query_param("state", "active")
///     .query_param("group_id", "abc")
///     .build()
///     .unwrap();
///
/// let base = BaseUrl::new("https://api.cloudpassage.com").unwrap();
/// assert_eq!(
///     request.url(&base, &ApiVersion::default()),
///     "https://api.cloudpassage.com/v1/servers?group_id=abc&state=active"
/// );
///
/// let create = HttpRequest::builder(HttpMethod::Post, "groups")
///     .body(&json!({"group": {"name": "web"}}))
///     .build()
///     .unwrap();
/// assert!(create.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The resource path, relative and unversioned, without a leading `/`.
    pub path: String,
    /// Query parameters, encoded in key order.
    pub query: BTreeMap<String, String>,
    /// The JSON request body, if any.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the path is empty or a query
    /// key is empty.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.query.keys().any(String::is_empty) {
            return Err(InvalidHttpRequestError::EmptyQueryKey);
        }

        Ok(())
    }

    /// Resolves the full resource URL: `{base}/{version}/{path}[?query]`.
    #[must_use]
    pub fn url(&self, base_url: &BaseUrl, api_version: &ApiVersion) -> String {
        let mut url = format!("{base_url}/{api_version}/{}", self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.encoded_query());
        }
        url
    }

    /// Returns the canonical query string: keys sorted, keys and values
    /// percent-encoded.
    #[must_use]
    pub fn encoded_query(&self) -> String {
        self.query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
    body_error: Option<String>,
}

impl HttpRequestBuilder {
    /// Creates a new builder with the required method and path.
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into().trim().trim_start_matches('/').to_string(),
            query: BTreeMap::new(),
            body: None,
            body_error: None,
        }
    }

    /// Sets the JSON request body.
    ///
    /// The value is serialized immediately; a serialization failure is
    /// reported by [`build`](Self::build). A value that serializes to `null`
    /// leaves the request without a body.
    #[must_use]
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(serde_json::Value::Null) => {
                self.body = None;
                self.body_error = None;
            }
            Ok(value) => {
                self.body = Some(value);
                self.body_error = None;
            }
            Err(e) => {
                self.body = None;
                self.body_error = Some(e.to_string());
            }
        }
        self
    }

    /// Replaces all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: BTreeMap<String, String>) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter. A repeated key overwrites the earlier value.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the body failed to serialize or
    /// the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        if let Some(reason) = self.body_error {
            return Err(InvalidHttpRequestError::InvalidBody { reason });
        }

        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            query: self.query,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    fn base() -> BaseUrl {
        BaseUrl::new("https://api.cloudpassage.com").unwrap()
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_builder_creates_valid_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "servers")
            .build()
            .unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "servers");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_url_includes_version_segment() {
        let request = HttpRequest::builder(HttpMethod::Get, "/servers/abc")
            .build()
            .unwrap();

        assert_eq!(
            request.url(&base(), &ApiVersion::default()),
            "https://api.cloudpassage.com/v1/servers/abc"
        );
        assert_eq!(
            request.url(&base(), &ApiVersion::new("v2").unwrap()),
            "https://api.cloudpassage.com/v2/servers/abc"
        );
    }

    #[test]
    fn test_query_is_sorted_and_encoded() {
        let request = HttpRequest::builder(HttpMethod::Get, "servers")
            .query_param("z", "last")
            .query_param("a", "x y&z")
            .query_param("a", "first wins? no, last")
            .build()
            .unwrap();

        assert_eq!(
            request.encoded_query(),
            "a=first%20wins%3F%20no%2C%20last&z=last"
        );
    }

    #[test]
    fn test_query_order_does_not_matter() {
        let first = HttpRequest::builder(HttpMethod::Get, "servers")
            .query_param("b", "2")
            .query_param("a", "1")
            .build()
            .unwrap();
        let second = HttpRequest::builder(HttpMethod::Get, "servers")
            .query_param("a", "1")
            .query_param("b", "2")
            .build()
            .unwrap();

        let version = ApiVersion::default();
        assert_eq!(first.url(&base(), &version), second.url(&base(), &version));
    }

    #[test]
    fn test_builder_serializes_body() {
        #[derive(Serialize)]
        struct Group<'a> {
            name: &'a str,
        }

        let request = HttpRequest::builder(HttpMethod::Post, "groups")
            .body(&json!({"group": Group { name: "web" }}))
            .build()
            .unwrap();

        assert_eq!(request.body, Some(json!({"group": {"name": "web"}})));
    }

    #[test]
    fn test_null_body_is_absent() {
        let request = HttpRequest::builder(HttpMethod::Put, "groups/1")
            .body(&Option::<u8>::None)
            .build()
            .unwrap();

        assert!(request.body.is_none());
    }

    #[test]
    fn test_unserializable_body_is_rejected() {
        struct Broken;
        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(S::Error::custom("broken"))
            }
        }

        let result = HttpRequest::builder(HttpMethod::Post, "groups")
            .body(&Broken)
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::InvalidBody { reason }) if reason.contains("broken")
        ));
    }

    #[test]
    fn test_verify_rejects_empty_path() {
        let result = HttpRequest::builder(HttpMethod::Get, "/").build();
        assert!(matches!(result, Err(InvalidHttpRequestError::EmptyPath)));
    }

    #[test]
    fn test_verify_rejects_empty_query_key() {
        let result = HttpRequest::builder(HttpMethod::Get, "servers")
            .query_param("", "x")
            .build();
        assert!(matches!(result, Err(InvalidHttpRequestError::EmptyQueryKey)));
    }
}
