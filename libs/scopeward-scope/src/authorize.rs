use crate::scope::covers;

/// True if at least one held scope covers `required`.
#[must_use]
pub fn is_satisfied<H: AsRef<str>>(held: &[H], required: &str) -> bool {
    held.iter().any(|scope| covers(scope.as_ref(), required))
}

/// True if every required scope is covered by some held scope.
///
/// An empty `required` set is always satisfied.
#[must_use]
pub fn authorize<H, R>(held: &[H], required: &[R]) -> bool
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    required
        .iter()
        .all(|scope| is_satisfied(held, scope.as_ref()))
}

/// Required scopes that no held scope covers, in declaration order.
#[must_use]
pub fn unsatisfied<'r, H, R>(held: &[H], required: &'r [R]) -> Vec<&'r str>
where
    H: AsRef<str>,
    R: AsRef<str>,
{
    required
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|scope| !is_satisfied(held, scope))
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn ancestor_covers_descendant() {
        assert!(authorize(&["system:user"], &["system:user:read"]));
        assert!(!authorize(&["system:user:read"], &["system:user"]));
    }

    #[test]
    fn exact_match_is_sufficient() {
        assert!(authorize(&["system:menu:read"], &["system:menu:read"]));
    }

    #[test]
    fn all_required_scopes_must_hold() {
        let held = ["system:user:read", "system:role:read"];
        assert!(authorize(&held, &["system:user:read", "system:role:read"]));
        assert!(!authorize(
            &held,
            &["system:user:update", "system:role:read"]
        ));
    }

    #[test]
    fn empty_requirement_is_satisfied() {
        let required: [&str; 0] = [];
        assert!(authorize(&["anything"], &required));
        assert!(authorize::<&str, &str>(&[], &required));
    }

    #[test]
    fn no_false_positive_on_textual_prefix() {
        assert!(!authorize(&["system:user"], &["system:userx"]));
        assert!(!authorize(&["system:user"], &["system:userx:read"]));
    }

    #[test]
    fn unsatisfied_lists_missing_scopes() {
        let held = ["system:user"];
        let required = ["system:user:read", "system:role:read", "system:menu"];
        assert_eq!(
            unsatisfied(&held, &required),
            vec!["system:role:read", "system:menu"]
        );
    }
}
