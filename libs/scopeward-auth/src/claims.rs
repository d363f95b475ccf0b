use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject - the `sub` claim. See <https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.2>
    #[serde(rename = "sub")]
    pub subject: String,

    /// Reduced scope set granted to the subject
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Expiration time - the `exp` claim, seconds since the Unix epoch. See <https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.4>
    #[serde(rename = "exp", with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl TokenClaims {
    /// Check if the token has expired at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// True if the embedded scopes cover `scope`.
    #[must_use]
    pub fn grants(&self, scope: &str) -> bool {
        scopeward_scope::is_satisfied(&self.scopes, scope)
    }
}

/// Login response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    #[must_use]
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_owned(),
        }
    }
}
