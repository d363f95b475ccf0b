use crate::{
    claims::TokenClaims, errors::AuthError, traits::PrimaryAuthorizer, types::RequiredScopes,
};

/// Authorizer applying the hierarchical scope rule: a held scope grants
/// itself and everything below it.
#[derive(Debug, Clone, Default)]
pub struct ScopeAuthorizer;

impl PrimaryAuthorizer for ScopeAuthorizer {
    fn check(&self, claims: &TokenClaims, required: &RequiredScopes) -> Result<(), AuthError> {
        let missing = scopeward_scope::unsatisfied(&claims.scopes, required.as_slice());
        if missing.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            subject = %claims.subject,
            missing = ?missing,
            "Insufficient scope"
        );
        Err(AuthError::InsufficientScope {
            missing: missing.into_iter().map(str::to_owned).collect(),
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn mock_claims(scopes: &[&str]) -> TokenClaims {
        TokenClaims {
            subject: "alice".to_owned(),
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
            expires_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn test_exact_scope_match() {
        let claims = mock_claims(&["system:user:read"]);
        let req = RequiredScopes::new(["system:user:read"]);
        assert!(ScopeAuthorizer.check(&claims, &req).is_ok());
    }

    #[test]
    fn test_ancestor_scope_match() {
        let claims = mock_claims(&["system:user"]);
        let req = RequiredScopes::new(["system:user:delete"]);
        assert!(ScopeAuthorizer.check(&claims, &req).is_ok());
    }

    #[test]
    fn test_descendant_does_not_cover_ancestor() {
        let claims = mock_claims(&["system:user:read"]);
        let req = RequiredScopes::new(["system:user"]);
        assert!(matches!(
            ScopeAuthorizer.check(&claims, &req),
            Err(AuthError::InsufficientScope { missing }) if missing == ["system:user"]
        ));
    }

    #[test]
    fn test_all_required_scopes_enforced() {
        let claims = mock_claims(&["system:user"]);
        let req = RequiredScopes::new(["system:user:update", "system:role:read"]);
        assert!(matches!(
            ScopeAuthorizer.check(&claims, &req),
            Err(AuthError::InsufficientScope { missing }) if missing == ["system:role:read"]
        ));
    }

    #[test]
    fn test_empty_requirement_passes() {
        let claims = mock_claims(&[]);
        assert!(ScopeAuthorizer
            .check(&claims, &RequiredScopes::default())
            .is_ok());
    }
}
