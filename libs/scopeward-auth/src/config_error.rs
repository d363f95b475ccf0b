use thiserror::Error;

/// Errors that can occur while building the token authority or route policy
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("security.secret_key must be set")]
    MissingSecret,

    #[error("unsupported signing algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("token expiry must be between 1 and {max} days, got {0}", max = crate::config::MAX_TOKEN_EXPIRE_DAYS)]
    InvalidExpiry(i64),

    #[error("invalid route pattern '{path}': {reason}")]
    InvalidRoute { path: String, reason: String },
}
