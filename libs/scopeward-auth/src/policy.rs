//! Declarative per-route scope requirements.
//!
//! Routes are registered once at start-up with the scopes they demand; the
//! auth middleware resolves each request through [`ScopePolicy`] instead of
//! handlers checking scopes themselves.

use crate::{
    config_error::ConfigError,
    types::{AuthRequirement, RoutePolicy},
};
use http::Method;
use scopeward_scope::ScopeRegistry;
use std::collections::{BTreeSet, HashMap};

/// Route patterns per HTTP method, each mapped to its requirement.
pub struct ScopePolicy {
    routes: HashMap<Method, matchit::Router<AuthRequirement>>,
    fallback: AuthRequirement,
    declared: BTreeSet<String>,
}

impl ScopePolicy {
    #[must_use]
    pub fn builder() -> ScopePolicyBuilder {
        ScopePolicyBuilder::default()
    }

    /// Every scope named by a registered route, sorted.
    pub fn declared_scopes(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(String::as_str)
    }

    /// Declared scopes missing from `registry`. Each one is logged as a
    /// warning since no principal can normally hold it.
    #[must_use]
    pub fn unknown_scopes(&self, registry: &ScopeRegistry) -> Vec<String> {
        let unknown: Vec<String> = registry
            .unknown(self.declared_scopes())
            .into_iter()
            .map(str::to_owned)
            .collect();

        for scope in &unknown {
            tracing::warn!(scope = %scope, "Route requires a scope that is not registered");
        }
        unknown
    }
}

impl ScopePolicy {
    fn lookup(&self, method: &Method, path: &str) -> Option<&AuthRequirement> {
        self.routes
            .get(method)
            .and_then(|router| router.at(path).ok())
            .map(|matched| matched.value)
    }
}

impl RoutePolicy for ScopePolicy {
    fn resolve(&self, method: &Method, path: &str) -> AuthRequirement {
        // axum answers HEAD with the GET handler when no HEAD route exists
        let matched = match self.lookup(method, path) {
            None if method == Method::HEAD => self.lookup(&Method::GET, path),
            found => found,
        };
        matched.map_or_else(|| self.fallback.clone(), Clone::clone)
    }
}

/// Builder for [`ScopePolicy`]
pub struct ScopePolicyBuilder {
    routes: Vec<(Method, String, AuthRequirement)>,
    fallback: AuthRequirement,
}

impl Default for ScopePolicyBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            fallback: AuthRequirement::authenticated(),
        }
    }
}

impl ScopePolicyBuilder {
    /// Register `path` (matchit syntax, e.g. `/users/{id}`) under `method`.
    #[must_use]
    pub fn route(mut self, method: Method, path: &str, requirement: AuthRequirement) -> Self {
        self.routes.push((method, path.to_owned(), requirement));
        self
    }

    #[must_use]
    pub fn require<I, S>(self, method: Method, path: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.route(method, path, AuthRequirement::scopes(scopes))
    }

    #[must_use]
    pub fn public(self, method: Method, path: &str) -> Self {
        self.route(method, path, AuthRequirement::Public)
    }

    #[must_use]
    pub fn optional(self, method: Method, path: &str) -> Self {
        self.route(method, path, AuthRequirement::Optional)
    }

    /// Requirement for requests matching no registered route
    /// (default: authentication without extra scopes).
    #[must_use]
    pub fn fallback(mut self, requirement: AuthRequirement) -> Self {
        self.fallback = requirement;
        self
    }

    /// Build the policy.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRoute` if a pattern is malformed or
    /// conflicts with one already registered for the same method.
    pub fn build(self) -> Result<ScopePolicy, ConfigError> {
        let mut routes: HashMap<Method, matchit::Router<AuthRequirement>> = HashMap::new();
        let mut declared = BTreeSet::new();

        for (method, path, requirement) in self.routes {
            if let AuthRequirement::Required(scopes) = &requirement {
                declared.extend(scopes.iter().map(str::to_owned));
            }

            tracing::debug!(
                method = %method,
                path = %path,
                requirement = ?requirement,
                "Registered route policy"
            );

            routes
                .entry(method)
                .or_insert_with(matchit::Router::new)
                .insert(path.clone(), requirement)
                .map_err(|e| ConfigError::InvalidRoute {
                    path,
                    reason: e.to_string(),
                })?;
        }

        Ok(ScopePolicy {
            routes,
            fallback: self.fallback,
            declared,
        })
    }
}
