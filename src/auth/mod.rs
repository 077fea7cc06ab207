//! Authentication against the Halo API.
//!
//! Halo uses an OAuth-style client-credentials exchange: the application
//! key/secret pair is traded for a short-lived bearer token. The
//! [`HaloClient`](crate::clients::HaloClient) calls [`renew_access_token`]
//! whenever it has no token or the API signals that the token expired, and
//! caches the result.
//!
//! - [`renew_access_token`]: performs one exchange round trip
//! - [`AccessTokenResponse`]: the token endpoint's success payload
//! - [`AuthError`]: exchange failures

mod access_token;
mod error;

pub use access_token::{access_token_url, renew_access_token, AccessTokenResponse};
pub use error::AuthError;
