//! Colon-delimited permission scopes and the hierarchy rule shared by
//! reduction and authorization.
//!
//! A scope such as `system:user:read` is read from general to specific.
//! Holding `system:user` implies every scope below it (`system:user:read`,
//! `system:user:role:update`, ...), but never a sibling that merely shares a
//! textual prefix (`system:userx`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Segment separator inside a scope name.
pub const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("scope must not be empty")]
    Empty,
}

/// A validated, non-empty permission name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope(String);

impl Scope {
    /// Create a scope from its name.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Empty`] if `name` is the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, ScopeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ScopeError::Empty);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of segments (`count(':') + 1`).
    #[must_use]
    pub fn depth(&self) -> usize {
        depth(&self.0)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// The closest enclosing scope, `None` for single-segment scopes.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
    }

    /// True if holding `self` grants `required`.
    #[must_use]
    pub fn covers(&self, required: &str) -> bool {
        covers(&self.0, required)
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Scope {
    type Error = ScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Scope {
    type Error = ScopeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.0
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of segments in `scope`.
#[must_use]
pub fn depth(scope: &str) -> usize {
    scope.matches(SEPARATOR).count() + 1
}

/// True if `scope` is a strict descendant of `ancestor`, i.e. it starts with
/// `ancestor` immediately followed by the separator.
#[must_use]
pub fn is_descendant_of(scope: &str, ancestor: &str) -> bool {
    scope
        .strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

/// True if a principal holding `held` is granted `required`: either the two
/// are equal or `held` is an ancestor of `required`.
#[must_use]
pub fn covers(held: &str, required: &str) -> bool {
    held == required || is_descendant_of(required, held)
}

/// Proper ancestors of `scope`, most general first.
///
/// `a:b:c` yields `a`, then `a:b`.
pub fn ancestors(scope: &str) -> impl Iterator<Item = &str> {
    scope
        .match_indices(SEPARATOR)
        .map(move |(idx, _)| &scope[..idx])
}
