//! Bearer-token authentication for the posters API.

use thiserror::Error;

pub mod duration;
pub mod jwt;

pub use duration::parse_duration;
pub use jwt::{mint_token, Claims, JwtConfig, JwtVerifier, MIN_SECRET_BYTES};

/// Reasons a token or the auth configuration is rejected.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing or malformed token")]
    MissingToken,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("token has no expiration")]
    NoExpiration,

    #[error("invalid token")]
    Invalid,

    #[error("invalid duration '{raw}': {reason}")]
    InvalidDuration { raw: String, reason: String },

    #[error("invalid auth configuration: {0}")]
    Config(String),
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}
