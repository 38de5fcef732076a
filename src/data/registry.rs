//! Named data namespaces for a single generation run.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Lookup of a namespace that was never registered.
///
/// Kept distinct from [`ResolutionError`](super::ResolutionError) so callers
/// can tell "unknown data source" apart from "value not present in source".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("data source '{name}' is not registered")]
pub struct SourceNotFound {
    /// The name that was looked up
    pub name: String,
}

/// Holds the root value of each named data namespace.
///
/// Registering a name twice replaces the earlier root (last write wins).
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Value>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace root, returning the root it replaced, if any.
    pub fn register(&mut self, name: impl Into<String>, root: Value) -> Option<Value> {
        let name = name.into();
        let previous = self.sources.insert(name.clone(), root);
        if previous.is_some() {
            log::debug!("Data source '{}' re-registered; previous root replaced", name);
        }
        previous
    }

    /// Builder-style registration.
    pub fn with_source(mut self, name: impl Into<String>, root: Value) -> Self {
        self.register(name, root);
        self
    }

    /// Look up a namespace root by name.
    pub fn lookup(&self, name: &str) -> Result<&Value, SourceNotFound> {
        self.sources.get(name).ok_or_else(|| SourceNotFound {
            name: name.to_string(),
        })
    }

    /// Check whether a namespace is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Registered namespace names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Number of registered namespaces.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if no namespaces are registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for SourceRegistry {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut registry = SourceRegistry::new();
        for (name, root) in iter {
            registry.register(name, root);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SourceRegistry::new();
        registry.register("cfr", json!({"recipient": {"title_and_name": "Mr J Smith"}}));

        assert!(registry.contains("cfr"));
        assert_eq!(
            registry.lookup("cfr").unwrap()["recipient"]["title_and_name"],
            "Mr J Smith"
        );
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = SourceRegistry::new().with_source("cyc", json!({}));
        let err = registry.lookup("cfr").unwrap_err();
        assert_eq!(err.name, "cfr");
        assert_eq!(err.to_string(), "data source 'cfr' is not registered");
    }

    #[test]
    fn test_duplicate_registration_last_write_wins() {
        let mut registry = SourceRegistry::new();
        assert!(registry.register("user_input", json!({"a": 1})).is_none());
        let previous = registry.register("user_input", json!({"a": 2}));

        assert_eq!(previous, Some(json!({"a": 1})));
        assert_eq!(registry.lookup("user_input").unwrap(), &json!({"a": 2}));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_iterator_and_names() {
        let registry: SourceRegistry = vec![
            ("illustration", json!({})),
            ("cfr", json!({})),
            ("cyc", json!([])),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["cfr", "cyc", "illustration"]);
    }
}
