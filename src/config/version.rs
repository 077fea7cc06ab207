//! Halo API version segment.
//!
//! This module provides the [`ApiVersion`] type naming the versioned path
//! prefix (e.g. `v1`) that every resource URL is resolved under.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A validated API version path segment.
///
/// The segment is `v` followed by one or more ASCII digits. The default is
/// `v1`, the only version the Halo API currently publishes.
///
/// # Example
///
/// ```rust
/// use cphalo::ApiVersion;
///
/// let version: ApiVersion = "v2".parse().unwrap();
/// assert_eq!(version.to_string(), "v2");
/// assert_eq!(ApiVersion::default().as_ref(), "v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiVersion(String);

impl ApiVersion {
    /// The default version segment.
    pub const DEFAULT: &'static str = "v1";

    /// Creates a new validated version segment.
    ///
    /// Input is trimmed and lowercased before validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiVersion`] if the segment is not `v`
    /// followed by digits.
    pub fn new(version: impl Into<String>) -> Result<Self, ConfigError> {
        let version = version.into().trim().to_lowercase();
        if Self::is_valid_version_format(&version) {
            Ok(Self(version))
        } else {
            Err(ConfigError::InvalidApiVersion { version })
        }
    }

    fn is_valid_version_format(s: &str) -> bool {
        s.strip_prefix('v')
            .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for ApiVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_v1() {
        assert_eq!(ApiVersion::default().as_ref(), "v1");
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let version: ApiVersion = " V3 ".parse().unwrap();
        assert_eq!(version.as_ref(), "v3");
    }

    #[test]
    fn test_rejects_malformed_segments() {
        for bad in ["", "v", "1", "version1", "v1.0", "v1/"] {
            assert!(
                matches!(
                    ApiVersion::new(bad),
                    Err(ConfigError::InvalidApiVersion { .. })
                ),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
