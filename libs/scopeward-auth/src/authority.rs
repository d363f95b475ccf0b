//! Issuing and verifying signed access tokens.
//!
//! Tokens are compact HMAC-signed JWTs carrying `sub`, `scopes` and `exp`.
//! The authority holds only immutable key material, so one instance can be
//! shared across any number of concurrent requests.

use crate::{
    claims::{TokenClaims, TokenResponse},
    config::SecurityConfig,
    config_error::ConfigError,
    token_error::TokenError,
    traits::TokenValidator,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::fmt;
use time::{Duration, OffsetDateTime};

pub struct TokenAuthority {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenAuthority {
    /// Build an authority from validated configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn from_config(config: &SecurityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let algorithm = config.signing_algorithm()?;
        let secret = config.secret_key.expose().as_bytes();

        let mut validation = Validation::new(algorithm);
        // Time checks are done in `verify_at` so expiry is reported precisely
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        let empty_claims: &[&str] = &[];
        validation.set_required_spec_claims(empty_claims);

        tracing::info!(
            algorithm = ?algorithm,
            token_expire_days = config.token_expire_days,
            "Token authority initialized"
        );

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: config.token_ttl(),
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` carrying `scopes` as given, valid for `ttl`.
    ///
    /// Callers normally pass a set already minimized with
    /// [`scopeward_scope::reduce`]; see [`issue_for`](Self::issue_for).
    ///
    /// # Errors
    /// Returns `TokenError::InvalidClaim` if `subject` is empty or `ttl` is not
    /// positive, and `TokenError::Encode` if signing fails.
    pub fn issue<S: AsRef<str>>(
        &self,
        subject: &str,
        scopes: &[S],
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Self::build_claims(subject, scopes, ttl, OffsetDateTime::now_utc())?;
        let token = self.sign(&claims)?;

        tracing::info!(
            subject = %claims.subject,
            scopes = claims.scopes.len(),
            expires_at = claims.expires_at.unix_timestamp(),
            "Issued access token"
        );

        Ok(token)
    }

    /// Reduce a principal's raw permission names and issue a bearer token
    /// with the configured default lifetime.
    ///
    /// # Errors
    /// See [`issue`](Self::issue).
    pub fn issue_for<I, S>(&self, subject: &str, permissions: I) -> Result<TokenResponse, TokenError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scopes = scopeward_scope::reduce(permissions);
        self.issue(subject, &scopes, self.default_ttl)
            .map(TokenResponse::bearer)
    }

    /// Sign an arbitrary claim set.
    ///
    /// # Errors
    /// Returns `TokenError::Encode` if serialization or signing fails.
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// See [`verify_at`](Self::verify_at).
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Verify signature and claims, treating `now` as the current time.
    ///
    /// # Errors
    /// - `TokenError::Missing` for an empty token
    /// - `TokenError::Malformed` if the token or its claims cannot be decoded
    /// - `TokenError::BadSignature` if the signature or algorithm does not match
    /// - `TokenError::InvalidClaim` if the subject is empty
    /// - `TokenError::Expired` if `now` is at or past `exp`
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<TokenClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let err = TokenError::from(e);
                tracing::debug!(error = %err, "Token verification failed");
                err
            })?
            .claims;

        if claims.subject.is_empty() {
            return Err(TokenError::InvalidClaim {
                field: "sub".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if claims.is_expired_at(now) {
            tracing::debug!(
                subject = %claims.subject,
                expires_at = claims.expires_at.unix_timestamp(),
                "Token expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn build_claims<S: AsRef<str>>(
        subject: &str,
        scopes: &[S],
        ttl: Duration,
        now: OffsetDateTime,
    ) -> Result<TokenClaims, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::InvalidClaim {
                field: "sub".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }
        if !ttl.is_positive() {
            return Err(TokenError::InvalidClaim {
                field: "exp".to_owned(),
                reason: format!("ttl must be positive, got {ttl}"),
            });
        }

        // `exp` travels as whole seconds
        let expires_at = now
            .checked_add(ttl)
            .and_then(|exp| exp.replace_nanosecond(0).ok())
            .ok_or_else(|| TokenError::InvalidClaim {
                field: "exp".to_owned(),
                reason: "expiry out of range".to_owned(),
            })?;

        Ok(TokenClaims {
            subject: subject.to_owned(),
            scopes: scopes.iter().map(|s| s.as_ref().to_owned()).collect(),
            expires_at,
        })
    }
}

impl TokenValidator for TokenAuthority {
    fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(token)
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::secret_string::SecretString;

    fn authority() -> TokenAuthority {
        authority_with("unit-test-secret", "HS256")
    }

    fn authority_with(secret: &str, algorithm: &str) -> TokenAuthority {
        TokenAuthority::from_config(&SecurityConfig {
            secret_key: SecretString::new(secret),
            algorithm: algorithm.to_owned(),
            token_expire_days: 7,
        })
        .unwrap()
    }

    /// Replace the first character of the signature segment with a different
    /// base64url character, keeping the token decodable.
    fn corrupt_signature(token: &str) -> String {
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{unsigned}.{}", chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let authority = authority();
        let scopes = ["system:user", "system:menu:read"];
        let token = authority.issue("alice", &scopes, Duration::hours(1)).unwrap();

        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.scopes, scopes);
        assert!(claims.expires_at > OffsetDateTime::now_utc());
    }

    #[test]
    fn test_token_is_three_part_compact_form() {
        let token = authority().issue("alice", &["a"], Duration::hours(1)).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_issue_for_reduces_and_uses_default_ttl() {
        let authority = authority();
        let response = authority
            .issue_for("bob", ["a:b:c", "a:b:d", "a:b", "d", "e:f"])
            .unwrap();
        assert_eq!(response.token_type, "bearer");

        let claims = authority.verify(&response.access_token).unwrap();
        assert_eq!(claims.scopes, vec!["d", "a:b", "e:f"]);

        let remaining = claims.expires_at - OffsetDateTime::now_utc();
        assert!(remaining <= Duration::days(7));
        assert!(remaining > Duration::days(7) - Duration::minutes(1));
    }

    #[test]
    fn test_expired_token_rejected() {
        let authority = authority();
        let token = authority.issue("alice", &["a"], Duration::hours(1)).unwrap();

        let later = OffsetDateTime::now_utc() + Duration::hours(2);
        assert_eq!(authority.verify_at(&token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let authority = authority();
        let expires_at = OffsetDateTime::from_unix_timestamp(2_000_000_000).unwrap();
        let token = authority
            .sign(&TokenClaims {
                subject: "alice".to_owned(),
                scopes: vec![],
                expires_at,
            })
            .unwrap();

        assert!(authority
            .verify_at(&token, expires_at - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            authority.verify_at(&token, expires_at),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_corrupted_signature_rejected() {
        let authority = authority();
        let token = authority.issue("alice", &["a"], Duration::hours(1)).unwrap();
        assert_eq!(
            authority.verify(&corrupt_signature(&token)),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_foreign_key_rejected() {
        let token = authority_with("other-secret", "HS256")
            .issue("alice", &["a"], Duration::hours(1))
            .unwrap();
        assert_eq!(authority().verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let token = authority_with("unit-test-secret", "HS512")
            .issue("alice", &["a"], Duration::hours(1))
            .unwrap();
        assert_eq!(authority().verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let authority = authority();
        let token = authority.issue("alice", &["a"], Duration::hours(1)).unwrap();
        let other = authority.issue("mallory", &["system"], Duration::hours(1)).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(authority.verify(&spliced), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_and_missing_tokens() {
        let authority = authority();
        assert_eq!(authority.verify(""), Err(TokenError::Missing));
        assert_eq!(authority.verify("   "), Err(TokenError::Missing));
        assert!(matches!(
            authority.verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            authority.verify("a.b.c"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_subject_rejected() {
        let authority = authority();
        assert!(matches!(
            authority.issue("", &["a"], Duration::hours(1)),
            Err(TokenError::InvalidClaim { .. })
        ));

        let token = authority
            .sign(&TokenClaims {
                subject: String::new(),
                scopes: vec![],
                expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
            })
            .unwrap();
        assert!(matches!(
            authority.verify(&token),
            Err(TokenError::InvalidClaim { .. })
        ));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let authority = authority();
        for ttl in [Duration::ZERO, Duration::seconds(-5)] {
            assert!(matches!(
                authority.issue("alice", &["a"], ttl),
                Err(TokenError::InvalidClaim { .. })
            ));
        }
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", authority());
        assert!(debug.contains("HS256"));
        assert!(!debug.contains("unit-test-secret"));
    }
}
