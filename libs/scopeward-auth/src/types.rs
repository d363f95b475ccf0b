use http::Method;

/// Scopes an endpoint demands; every one of them must be granted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredScopes(Vec<String>);

impl RequiredScopes {
    #[must_use]
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(scopes.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RequiredScopes {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Route-level authentication requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequirement {
    /// No authentication required; route is public from auth perspective.
    Public,
    /// Optional authentication: if a valid token is present, use it;
    /// otherwise proceed anonymously.
    Optional,
    /// A valid token is required and must grant every listed scope.
    /// An empty list only demands authentication.
    Required(RequiredScopes),
}

impl AuthRequirement {
    #[must_use]
    pub fn scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Required(RequiredScopes::new(scopes))
    }

    #[must_use]
    pub fn authenticated() -> Self {
        Self::Required(RequiredScopes::default())
    }
}

/// Route policy that determines authentication requirements for routes
pub trait RoutePolicy: Send + Sync {
    /// Resolve the authentication requirement for a given method and path
    fn resolve(&self, method: &Method, path: &str) -> AuthRequirement;
}

/// A single requirement applied to every route.
impl RoutePolicy for AuthRequirement {
    fn resolve(&self, _method: &Method, _path: &str) -> AuthRequirement {
        self.clone()
    }
}
