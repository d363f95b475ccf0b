use crate::scope::{ancestors, depth};
use std::collections::HashSet;

/// Collapse a scope set into its minimal covering form.
///
/// Scopes are visited from most general to most specific (stable on input
/// order for equal depth). A scope is kept unless it duplicates a kept scope
/// or descends from one. The returned list is in acceptance order and is an
/// antichain: no kept scope is an ancestor of another.
///
/// ```
/// use scopeward_scope::reduce;
///
/// let reduced = reduce(["a:b:c", "a:b:d", "a:b", "d", "e:f"]);
/// assert_eq!(reduced, vec!["d", "a:b", "e:f"]);
/// ```
#[must_use]
pub fn reduce<I, S>(scopes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ordered: Vec<S> = scopes.into_iter().collect();
    ordered.sort_by_key(|scope| depth(scope.as_ref()));

    let mut covered: HashSet<&str> = HashSet::with_capacity(ordered.len());
    let mut reduced = Vec::new();

    for scope in &ordered {
        let scope = scope.as_ref();
        // Every ancestor has a smaller depth, so it was visited already.
        if covered.contains(scope) || ancestors(scope).any(|a| covered.contains(a)) {
            continue;
        }
        covered.insert(scope);
        reduced.push(scope.to_owned());
    }

    tracing::trace!(
        input = ordered.len(),
        reduced = reduced.len(),
        "Reduced scope set"
    );

    reduced
}
