use thiserror::Error;

/// Failures while minting or verifying a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid claim: {field} - {reason}")]
    InvalidClaim { field: String, reason: String },

    #[error("Token encoding failed: {0}")]
    Encode(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

impl From<TokenError> for crate::errors::AuthError {
    fn from(err: TokenError) -> Self {
        use crate::errors::AuthError;

        match err {
            TokenError::Missing => AuthError::Unauthenticated,
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Encode(msg) => AuthError::Internal(msg),
            other => {
                tracing::debug!(error = %other, "Rejected bearer token");
                AuthError::InvalidToken
            }
        }
    }
}
