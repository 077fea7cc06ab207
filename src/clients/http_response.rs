//! HTTP response type for the CPHalo API client.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

/// A response received from the Halo API.
///
/// The body is kept as raw bytes; decoding is left to the caller so that an
/// empty body (e.g. from `DELETE`) is never treated as a failure.
///
/// # Example
///
/// ```rust
/// use cphalo::clients::HttpResponse;
/// use std::collections::HashMap;
///
/// let response = HttpResponse::new(200, HashMap::new(), br#"{"count":2}"#.to_vec());
/// assert!(response.is_ok());
///
/// let value: serde_json::Value = response.json().unwrap();
/// assert_eq!(value["count"], 2);
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers; names lowercased, repeated headers kept in order.
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the status code is in `200..=299`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` if the status code signals an expired bearer token.
    ///
    /// The Halo documentation names `402`, while the service answers `401` in
    /// practice; both are accepted.
    #[must_use]
    pub const fn is_token_expired(&self) -> bool {
        self.code == 401 || self.code == 402
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not decode into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Collects reqwest headers into the lowercase multi-value map.
    pub(crate) fn collect_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), Vec::new())
    }

    #[test]
    fn test_is_ok_covers_2xx_only() {
        assert!(response(200).is_ok());
        assert!(response(299).is_ok());
        assert!(!response(199).is_ok());
        assert!(!response(300).is_ok());
    }

    #[test]
    fn test_expiry_signals() {
        assert!(response(401).is_token_expired());
        assert!(response(402).is_token_expired());
        assert!(!response(403).is_token_expired());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-request-id".to_string(),
            vec!["abc".to_string(), "def".to_string()],
        );
        let response = HttpResponse::new(200, headers, Vec::new());

        assert_eq!(response.header("X-Request-Id"), Some("abc"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_collect_headers_lowercases_and_groups() {
        let mut map = reqwest::header::HeaderMap::new();
        map.append("Set-Cookie", "a=1".parse().unwrap());
        map.append("Set-Cookie", "b=2".parse().unwrap());

        let headers = HttpResponse::collect_headers(&map);
        assert_eq!(
            headers.get("set-cookie"),
            Some(&vec!["a=1".to_string(), "b=2".to_string()])
        );
    }

    #[test]
    fn test_json_on_empty_body_fails() {
        assert!(response(200).json::<serde_json::Value>().is_err());
    }
}
