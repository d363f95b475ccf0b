use crate::scope::covers;
use std::collections::BTreeMap;

/// Immutable snapshot of the permission names known to the system, with
/// their human-readable descriptions.
///
/// Built once at start-up from the stored permissions and shared read-only
/// (typically behind an `Arc`) by everything that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRegistry {
    entries: BTreeMap<String, String>,
}

impl ScopeRegistry {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known scopes with their descriptions, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_str()))
    }

    /// Known scopes granted by holding `held` (including `held` itself when
    /// it is known).
    pub fn implied_by<'a>(&'a self, held: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(move |name| covers(held, name))
    }

    /// Names from `scopes` that are not in the registry, in input order.
    #[must_use]
    pub fn unknown<'s, I>(&self, scopes: I) -> Vec<&'s str>
    where
        I: IntoIterator<Item = &'s str>,
    {
        scopes
            .into_iter()
            .filter(|scope| !self.contains(scope))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for ScopeRegistry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, description)| (name.into(), description.into()))
                .collect(),
        }
    }
}
