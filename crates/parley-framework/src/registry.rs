//! Command registry.
//!
//! Maps command names to handlers. The registry is owned by the
//! [`Bot`](crate::bot::Bot): it is filled while the bot is being built and
//! only read afterwards, so it needs no locking.
//!
//! The name [`WILDCARD`] (`"*"`) is reserved for the catch-all handler that
//! runs on every message.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

/// The reserved command name of the catch-all handler.
pub const WILDCARD: &str = "*";

/// A map from command name to handler.
///
/// A name maps to at most one handler; registering a name again replaces the
/// previous binding.
#[derive(Clone)]
pub struct Registry<H> {
    entries: HashMap<String, H>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Registry<H> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Binds `name` to `handler`, returning the replaced binding if any.
    pub fn register(&mut self, name: impl Into<String>, handler: H) -> Option<H> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), handler);
        if previous.is_some() {
            debug!(command = %name, "Replaced existing command binding");
        }
        previous
    }

    /// Returns `true` if `name` has a handler.
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks up the handler bound to `name`.
    pub fn resolve(&self, name: &str) -> Option<&H> {
        self.entries.get(name)
    }

    /// Looks up the catch-all handler.
    pub fn wildcard(&self) -> Option<&H> {
        self.resolve(WILDCARD)
    }

    /// Returns the registered command names in sorted order, excluding the
    /// wildcard.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .keys()
            .map(String::as_str)
            .filter(|name| *name != WILDCARD)
            .collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of bindings, wildcard included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.commands())
            .field("wildcard", &self.wildcard().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = Registry::new();
        assert!(registry.register("ping", 1).is_none());

        assert!(registry.is_registered("ping"));
        assert_eq!(registry.resolve("ping"), Some(&1));
        assert!(!registry.is_registered("pong"));
        assert_eq!(registry.resolve("pong"), None);
    }

    #[test]
    fn test_reregister_replaces_binding() {
        let mut registry = Registry::new();
        registry.register("ping", "first");
        let previous = registry.register("ping", "second");

        assert_eq!(previous, Some("first"));
        assert_eq!(registry.resolve("ping"), Some(&"second"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_wildcard_is_not_a_command() {
        let mut registry = Registry::new();
        registry.register("b", 0);
        registry.register(WILDCARD, 1);
        registry.register("a", 2);

        assert_eq!(registry.wildcard(), Some(&1));
        assert_eq!(registry.commands(), vec!["a", "b"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry: Registry<()> = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.wildcard().is_none());
    }
}
