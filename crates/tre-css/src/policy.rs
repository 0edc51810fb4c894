//! Style filtering policy
//!
//! `ignored` drops properties; `allowed`, when present, is an allow-list
//! that wins over `ignored`. A property listed in both survives.

use std::collections::HashSet;

use crate::{normalize_property_name, StyleDeclarations};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StylePolicy {
    ignored: HashSet<String>,
    allowed: Option<HashSet<String>>,
}

impl StylePolicy {
    pub fn new<I, A, S, T>(ignored: I, allowed: Option<A>) -> Self
    where
        I: IntoIterator<Item = S>,
        A: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            ignored: ignored.into_iter().map(|s| normalize_property_name(s.as_ref())).collect(),
            allowed: allowed.map(|a| a.into_iter().map(|s| normalize_property_name(s.as_ref())).collect()),
        }
    }

    /// Whether `property` (normalized) may appear in a resolved set
    pub fn permits(&self, property: &str) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.contains(property),
            None => !self.ignored.contains(property),
        }
    }

    /// Whether the policy filters anything at all
    pub fn is_permissive(&self) -> bool {
        self.allowed.is_none() && self.ignored.is_empty()
    }

    /// Drop every property the policy rejects
    pub fn apply(&self, declarations: &mut StyleDeclarations) {
        if self.is_permissive() {
            return;
        }
        declarations.retain(|name, _| self.permits(name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_only() {
        let policy = StylePolicy::new(["font-size"], None::<Vec<&str>>);
        assert!(!policy.permits("fontSize"));
        assert!(policy.permits("color"));
    }

    #[test]
    fn test_allowed_overrides_ignored() {
        let policy = StylePolicy::new(["color", "fontSize"], Some(["color"]));
        assert!(policy.permits("color"));
        assert!(!policy.permits("fontSize"));
        assert!(!policy.permits("margin"));

        let mut decls = StyleDeclarations::new()
            .with("color", "red")
            .with("fontSize", 12.0)
            .with("margin", 4.0);
        policy.apply(&mut decls);
        assert_eq!(decls.len(), 1);
        assert!(decls.contains("color"));
    }
}
