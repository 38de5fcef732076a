//! Assembly options and configuration.

/// What to do when a placeholder cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Substitute a visible error marker and record a diagnostic
    #[default]
    Inline,
    /// Abort the whole assembly with the resolution error
    Abort,
}

/// Options for assembling a document.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Handling of unknown sources, missing paths and structured values
    pub unresolved: UnresolvedPolicy,

    /// Name bound to the current element in dynamic table rows
    pub row_alias: String,

    /// Name bound to the current element in data-driven lists
    pub item_alias: String,

    /// Run batch assemblies in parallel
    pub parallel: bool,
}

impl AssembleOptions {
    /// Create new assemble options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first unresolved placeholder.
    pub fn strict() -> Self {
        Self::default().with_unresolved(UnresolvedPolicy::Abort)
    }

    /// Set the unresolved-placeholder policy.
    pub fn with_unresolved(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    /// Set the dynamic row alias.
    pub fn with_row_alias(mut self, alias: impl Into<String>) -> Self {
        self.row_alias = alias.into();
        self
    }

    /// Set the list item alias.
    pub fn with_item_alias(mut self, alias: impl Into<String>) -> Self {
        self.item_alias = alias.into();
        self
    }

    /// Enable or disable parallel batch assembly.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check if unresolved placeholders abort assembly.
    pub fn is_strict(&self) -> bool {
        self.unresolved == UnresolvedPolicy::Abort
    }
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            unresolved: UnresolvedPolicy::Inline,
            row_alias: "row".to_string(),
            item_alias: "item".to_string(),
            parallel: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AssembleOptions::default();
        assert_eq!(options.unresolved, UnresolvedPolicy::Inline);
        assert_eq!(options.row_alias, "row");
        assert_eq!(options.item_alias, "item");
        assert!(!options.is_strict());
    }

    #[test]
    fn test_builder() {
        let options = AssembleOptions::strict()
            .with_row_alias("fund")
            .with_parallel(false);
        assert!(options.is_strict());
        assert_eq!(options.row_alias, "fund");
        assert!(!options.parallel);
    }
}
