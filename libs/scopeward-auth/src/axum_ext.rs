//! Axum extractors and middleware for auth

use crate::{
    errors::AuthError,
    principal::Principal,
    token_error::TokenError,
    traits::{PrimaryAuthorizer, TokenValidator},
    types::{AuthRequirement, RoutePolicy},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, Method, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Extractor for the request's [`Principal`] - requires the auth middleware
#[derive(Debug, Clone)]
pub struct Authn(pub Principal);

impl<S> FromRequestParts<S> for Authn
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Authn)
            .ok_or(AuthError::Internal(
                "Principal not found - auth middleware not configured".to_owned(),
            ))
    }
}

#[derive(Clone)]
pub struct AuthPolicyState {
    validator: Arc<dyn TokenValidator>,
    authorizer: Arc<dyn PrimaryAuthorizer>,
    policy: Arc<dyn RoutePolicy>,
}

impl AuthPolicyState {
    #[must_use]
    pub fn new(
        validator: Arc<dyn TokenValidator>,
        authorizer: Arc<dyn PrimaryAuthorizer>,
        policy: Arc<dyn RoutePolicy>,
    ) -> Self {
        Self {
            validator,
            authorizer,
            policy,
        }
    }
}

/// Unified auth middleware with route policy support
///
/// This middleware:
/// 1. Skips authentication for CORS preflight requests
/// 2. Resolves the route's requirement using `RoutePolicy`
/// 3. `Public`: inserts an anonymous `Principal`
/// 4. `Required`: verifies the bearer token, checks the declared scopes,
///    inserts the token's `TokenClaims` and `Principal`
/// 5. `Optional`: uses the token if present and valid, otherwise anonymous
pub async fn auth_with_policy(
    State(AuthPolicyState {
        validator,
        authorizer,
        policy,
    }): State<AuthPolicyState>,
    mut request: Request,
    next: Next,
) -> Response {
    // 1. Preflight: skip auth
    if is_preflight_request(request.method(), request.headers()) {
        return next.run(request).await;
    }

    // 2. Resolve route policy
    let requirement = policy.resolve(request.method(), request.uri().path());

    match requirement {
        AuthRequirement::Public => {
            request.extensions_mut().insert(Principal::anonymous());
            next.run(request).await
        }
        AuthRequirement::Required(required) => {
            let Some(token) = extract_bearer_token(request.headers()) else {
                return AuthError::from(TokenError::Missing).into_response();
            };

            let claims = match validator.validate(token) {
                Ok(claims) => claims,
                Err(err) => return AuthError::from(err).into_response(),
            };

            if let Err(err) = authorizer.check(&claims, &required) {
                return err.into_response();
            }

            request
                .extensions_mut()
                .insert(Principal::from(claims.clone()));
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        AuthRequirement::Optional => {
            let principal = match extract_bearer_token(request.headers()) {
                Some(token) => match validator.validate(token) {
                    Ok(claims) => {
                        let principal = Principal::from(claims.clone());
                        request.extensions_mut().insert(claims);
                        principal
                    }
                    Err(err) => {
                        tracing::debug!("Optional auth: invalid token: {err}");
                        Principal::anonymous()
                    }
                },
                None => Principal::anonymous(),
            };
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
}

/// Check if this is a CORS preflight request
///
/// Preflight requests are OPTIONS requests with:
/// - Origin header present
/// - Access-Control-Request-Method header present
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Bearer   abc ")), Some("abc"));
        assert_eq!(extract_bearer_token(&headers("Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer  ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn preflight_detection() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://example.com"));
        assert!(!is_preflight_request(&Method::OPTIONS, &headers));

        headers.insert(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("GET"),
        );
        assert!(is_preflight_request(&Method::OPTIONS, &headers));
        assert!(!is_preflight_request(&Method::GET, &headers));
    }
}
