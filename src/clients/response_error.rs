//! Classification of non-success Halo API responses.
//!
//! [`ResponseError::classify`] maps an HTTP status code and response body to
//! one variant of a closed taxonomy, so callers branch on the failure kind
//! instead of parsing message strings.
//!
//! | Status        | Variant                              | Body fields used                    |
//! |---------------|--------------------------------------|-------------------------------------|
//! | 404           | [`ResponseError::NotFound`]          | `resource`, `field`, `value`        |
//! | 422           | [`ResponseError::ValidationFailed`]  | `message`, `errors[]`               |
//! | 429           | [`ResponseError::RateLimited`]       | none                                |
//! | 5xx           | [`ResponseError::ServerError`]       | `code`, `message`                   |
//! | other 4xx     | [`ResponseError::BadRequest`]        | `message`                           |
//! | anything else | [`ResponseError::General`]           | `message`                           |
//!
//! An empty body still yields the variant with empty fields. A body that is
//! present but is not JSON is reported as a decode error.

use std::fmt::Write as _;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use thiserror::Error;

/// One field-level failure inside a `422 Unprocessable Entity` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldError {
    /// The offending field.
    #[serde(deserialize_with = "lenient_string")]
    pub field: String,
    /// The rejected value.
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    /// Machine-readable failure code (e.g. `invalid`, `missing`).
    #[serde(deserialize_with = "lenient_string")]
    pub code: String,
    /// Human-readable details.
    #[serde(deserialize_with = "lenient_string")]
    pub details: String,
}

/// A classified non-success response.
///
/// The set of variants is closed: every status code maps to exactly one of
/// them. Every variant reports its status code via
/// [`status_code`](Self::status_code).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    /// `404 Not Found`.
    #[error("resource {resource} with {field}={value} not found")]
    NotFound {
        /// Resource kind that was looked up (e.g. `server`).
        resource: String,
        /// Field used for the lookup (e.g. `id`).
        field: String,
        /// Value that matched nothing.
        value: String,
    },

    /// `422 Unprocessable Entity`.
    #[error("{}", validation_summary(.message, .errors))]
    ValidationFailed {
        /// Top-level message.
        message: String,
        /// Per-field failures.
        errors: Vec<FieldError>,
    },

    /// `429 Too Many Requests`.
    #[error("Too Many Requests")]
    RateLimited,

    /// Any `5xx` status.
    #[error("server failed with code {code} and error: {message}")]
    ServerError {
        /// The HTTP status code.
        status: u16,
        /// Error code reported in the body, or the status code if absent.
        code: String,
        /// Error message reported in the body.
        message: String,
    },

    /// Any `4xx` status without a dedicated variant.
    #[error("request failed with {status}: {message}")]
    BadRequest {
        /// The HTTP status code.
        status: u16,
        /// Error message reported in the body.
        message: String,
    },

    /// Any other non-2xx status.
    #[error("{message}")]
    General {
        /// The HTTP status code.
        status: u16,
        /// Error message reported in the body, verbatim.
        message: String,
    },
}

impl ResponseError {
    /// Classifies a response.
    ///
    /// Returns `Ok(None)` for statuses in `200..=299`. For any other status
    /// returns the matching variant, selected by exact code first (404, 422,
    /// 429), then by family (5xx, 4xx), else [`ResponseError::General`].
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body is non-empty and does not decode
    /// into the shape the selected variant expects. `429` never decodes its
    /// body.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cphalo::clients::ResponseError;
    ///
    /// let body = br#"{"resource":"server","field":"id","value":"x"}"#;
    /// let error = ResponseError::classify(404, body).unwrap().unwrap();
    /// assert_eq!(error.to_string(), "resource server with id=x not found");
    /// assert_eq!(error.status_code(), 404);
    ///
    /// assert!(ResponseError::classify(204, b"").unwrap().is_none());
    /// ```
    pub fn classify(status: u16, body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        if (200..=299).contains(&status) {
            return Ok(None);
        }

        let error = match status {
            404 => {
                let body: NotFoundBody = decode_body(body)?;
                Self::NotFound {
                    resource: body.resource,
                    field: body.field,
                    value: body.value,
                }
            }
            422 => {
                let body: ValidationBody = decode_body(body)?;
                Self::ValidationFailed {
                    message: body.message,
                    errors: body.errors,
                }
            }
            429 => Self::RateLimited,
            500..=599 => {
                let body: ServerBody = decode_body(body)?;
                Self::ServerError {
                    status,
                    code: body.code.unwrap_or_else(|| status.to_string()),
                    message: body.message,
                }
            }
            400..=499 => {
                let body: MessageBody = decode_body(body)?;
                Self::BadRequest {
                    status,
                    message: body.message,
                }
            }
            _ => {
                let body: MessageBody = decode_body(body)?;
                Self::General {
                    status,
                    message: body.message,
                }
            }
        };

        Ok(Some(error))
    }

    /// Returns the HTTP status code this error was classified from.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::ValidationFailed { .. } => 422,
            Self::RateLimited => 429,
            Self::ServerError { status, .. }
            | Self::BadRequest { status, .. }
            | Self::General { status, .. } => *status,
        }
    }
}

fn validation_summary(message: &str, errors: &[FieldError]) -> String {
    let mut summary = format!(
        "validation failed for {} fields with msg: {message}",
        errors.len()
    );
    for error in errors {
        let _ = write!(summary, "\n- {} {}", error.field, error.code);
    }
    summary
}

/// Decodes an error body, treating an empty or whitespace-only body as the
/// default shape.
fn decode_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

/// Accepts strings, numbers, booleans and `null` (as empty) for text fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string, number or boolean, got {other}"
        ))),
    }
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(|s| if s.is_empty() { None } else { Some(s) })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NotFoundBody {
    #[serde(deserialize_with = "lenient_string")]
    resource: String,
    #[serde(deserialize_with = "lenient_string")]
    field: String,
    #[serde(deserialize_with = "lenient_string")]
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValidationBody {
    #[serde(deserialize_with = "lenient_string")]
    message: String,
    errors: Vec<FieldError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerBody {
    #[serde(deserialize_with = "lenient_optional_string")]
    code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MessageBody {
    #[serde(deserialize_with = "lenient_string")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16, body: &str) -> ResponseError {
        ResponseError::classify(status, body.as_bytes())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_success_range_yields_no_error() {
        for status in [200, 201, 204, 250, 299] {
            assert!(ResponseError::classify(status, b"").unwrap().is_none());
            assert!(ResponseError::classify(status, b"not json")
                .unwrap()
                .is_none());
        }
    }

    #[test]
    fn test_not_found_message_format() {
        let error = classify(404, r#"{"resource":"server","field":"id","value":"x"}"#);
        assert_eq!(error.to_string(), "resource server with id=x not found");
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn test_validation_failed_lists_field_and_code() {
        let error = classify(
            422,
            r#"{"message":"message","errors":[{"field":"field","value":"value","code":"code","details":"details"}]}"#,
        );
        assert_eq!(
            error.to_string(),
            "validation failed for 1 fields with msg: message\n- field code"
        );
        assert_eq!(error.status_code(), 422);
    }

    #[test]
    fn test_validation_failed_accepts_non_string_values() {
        let error = classify(
            422,
            r#"{"message":"bad","errors":[{"field":"port","value":70000,"code":"invalid"}]}"#,
        );
        match error {
            ResponseError::ValidationFailed { errors, .. } => {
                assert_eq!(errors[0].value, "70000");
                assert_eq!(errors[0].details, "");
            }
            other => panic!("Expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_rate_limited_ignores_body() {
        let error = classify(429, "<html>slow down</html>");
        assert_eq!(error, ResponseError::RateLimited);
        assert_eq!(error.to_string(), "Too Many Requests");
        assert_eq!(error.status_code(), 429);
    }

    #[test]
    fn test_server_error_message_format() {
        let error = classify(500, r#"{"code":500,"message":"message"}"#);
        assert_eq!(
            error.to_string(),
            "server failed with code 500 and error: message"
        );
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_server_error_family_falls_back_to_status_code() {
        let error = classify(503, r#"{"message":"maintenance"}"#);
        assert_eq!(
            error.to_string(),
            "server failed with code 503 and error: maintenance"
        );
        assert_eq!(error.status_code(), 503);
    }

    #[test]
    fn test_bad_request_family() {
        let error = classify(400, r#"{"message":"test"}"#);
        assert_eq!(error.to_string(), "request failed with 400: test");

        let error = classify(418, r#"{"message":"teapot"}"#);
        assert_eq!(
            error,
            ResponseError::BadRequest {
                status: 418,
                message: "teapot".to_string()
            }
        );
    }

    #[test]
    fn test_general_error_uses_message_verbatim() {
        let error = classify(302, r#"{"message":"test"}"#);
        assert_eq!(error.to_string(), "test");
        assert_eq!(error.status_code(), 302);
    }

    #[test]
    fn test_empty_body_yields_typed_error() {
        for status in [400, 404, 422, 500, 302] {
            let error = ResponseError::classify(status, b"").unwrap().unwrap();
            assert_eq!(error.status_code(), status);
        }

        let error = classify(404, "  \n");
        assert_eq!(error.to_string(), "resource  with = not found");
    }

    #[test]
    fn test_non_json_body_is_decode_error() {
        assert!(ResponseError::classify(404, b"<html>gone</html>").is_err());
        assert!(ResponseError::classify(500, b"Internal Server Error").is_err());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let body = br#"{"message":"m","errors":[{"field":"f","code":"c"}]}"#;
        let first = ResponseError::classify(422, body).unwrap();
        let second = ResponseError::classify(422, body).unwrap();
        assert_eq!(first, second);
    }
}
