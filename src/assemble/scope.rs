//! Scoped traversal state: inherited styling and element bindings.

use crate::data::{SourceNotFound, SourceRegistry, Value};
use crate::template::{StyleContext, StyleFrame};

/// Traversal state for one assembly run.
///
/// Styles and bindings are pushed on entry to a node and popped on exit,
/// so nothing leaks across sibling subtrees.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    styles: StyleContext<'a>,
    bindings: Vec<(&'a str, &'a Value)>,
}

impl<'a> Scope<'a> {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style context.
    pub fn styles(&self) -> &StyleContext<'a> {
        &self.styles
    }

    /// Enter a styled scope.
    pub fn push_style(&mut self, frame: StyleFrame<'a>) {
        self.styles.push(frame);
    }

    /// Leave the innermost styled scope.
    pub fn pop_style(&mut self) {
        self.styles.pop();
    }

    /// Bind `name` to `value` as an extra lookup root.
    pub fn bind(&mut self, name: &'a str, value: &'a Value, registry: &SourceRegistry) {
        if registry.contains(name) {
            log::debug!("Binding '{}' shadows the registered source of the same name", name);
        }
        self.bindings.push((name, value));
    }

    /// Drop the innermost binding.
    pub fn unbind(&mut self) {
        self.bindings.pop();
    }

    /// The element bound to `name`, if any.
    pub fn bound(&self, name: &str) -> Option<&'a Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| *value)
    }

    /// Look up a root by name: bindings first (innermost wins), then the registry.
    pub fn lookup(
        &self,
        name: &str,
        registry: &'a SourceRegistry,
    ) -> Result<&'a Value, SourceNotFound> {
        match self.bound(name) {
            Some(value) => Ok(value),
            None => registry.lookup(name),
        }
    }
}
