use crate::{config_error::ConfigError, secret_string::SecretString};
use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Symmetric signing key
    #[serde(default)]
    pub secret_key: SecretString,

    /// Signing algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Lifetime of issued tokens in days
    #[serde(default = "default_token_expire_days")]
    pub token_expire_days: i64,
}

/// Upper bound for `token_expire_days` (about a century).
pub const MAX_TOKEN_EXPIRE_DAYS: i64 = 36_500;

fn default_algorithm() -> String {
    "HS256".to_owned()
}

fn default_token_expire_days() -> i64 {
    7
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: SecretString::default(),
            algorithm: default_algorithm(),
            token_expire_days: default_token_expire_days(),
        }
    }
}

impl SecurityConfig {
    /// Validate the configuration for consistency
    ///
    /// # Errors
    /// Returns `ConfigError` if the secret is empty, the algorithm is not an
    /// HMAC algorithm, or the expiry is outside `1..=MAX_TOKEN_EXPIRE_DAYS`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if !(1..=MAX_TOKEN_EXPIRE_DAYS).contains(&self.token_expire_days) {
            return Err(ConfigError::InvalidExpiry(self.token_expire_days));
        }
        self.signing_algorithm()?;
        Ok(())
    }

    /// Resolve the configured algorithm name.
    ///
    /// # Errors
    /// Returns `ConfigError::UnsupportedAlgorithm` for unknown names and for
    /// asymmetric algorithms, which a shared secret cannot drive.
    pub fn signing_algorithm(&self) -> Result<Algorithm, ConfigError> {
        let unsupported = || ConfigError::UnsupportedAlgorithm(self.algorithm.clone());

        match self
            .algorithm
            .to_ascii_uppercase()
            .parse::<Algorithm>()
            .map_err(|_| unsupported())?
        {
            alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => Ok(alg),
            _ => Err(unsupported()),
        }
    }

    /// Default lifetime of issued tokens. Only meaningful after [`validate`](Self::validate).
    #[must_use]
    pub fn token_ttl(&self) -> time::Duration {
        time::Duration::days(self.token_expire_days)
    }
}
