use crate::{
    claims::TokenClaims, errors::AuthError, token_error::TokenError, types::RequiredScopes,
};

/// Verifies a bearer token and returns its claims
pub trait TokenValidator: Send + Sync {
    /// Validate signature and expiry of `token`
    ///
    /// # Errors
    /// Returns `TokenError` if the token is missing, malformed, forged or expired.
    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// Primary authorizer that checks if claims satisfy a route's required scopes
pub trait PrimaryAuthorizer: Send + Sync {
    /// # Errors
    /// Returns `AuthError::InsufficientScope` if any required scope is not granted.
    fn check(&self, claims: &TokenClaims, required: &RequiredScopes) -> Result<(), AuthError>;
}
