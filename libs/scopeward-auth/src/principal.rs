use crate::claims::TokenClaims;

/// Caller identity attached to each request by the auth middleware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    subject: Option<String>,
    scopes: Vec<String>,
}

impl Principal {
    /// Caller without a (valid) token.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.subject.is_none()
    }

    /// True if the principal's scopes grant `scope`.
    #[must_use]
    pub fn can(&self, scope: &str) -> bool {
        scopeward_scope::is_satisfied(&self.scopes, scope)
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject: Some(claims.subject),
            scopes: claims.scopes,
        }
    }
}
