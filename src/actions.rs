//! Named actions that declared events resolve to.

use std::collections::HashMap;

use trellis_core::Handler;

/// Maps action names to handlers.
///
/// The compiler only reads from it; populating it is up to the application.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    actions: HashMap<String, Handler>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, returning the handler it replaced.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.actions.insert(name.into(), handler)
    }

    /// Builder-style variant of [`ActionRegistry::register`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.register(name, handler);
        self
    }

    /// Looks up the handler registered under `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Handler> {
        self.actions.get(name)
    }

    /// Removes the handler registered under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<Handler> {
        self.actions.remove(name)
    }

    /// Returns the number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when no action is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::handler;

    #[test]
    fn register_resolve_unregister() {
        let save = handler(|_| {});
        let mut actions = ActionRegistry::new().with("save", save.clone());
        assert!(actions.resolve("save").unwrap().ptr_eq(&save));
        assert!(actions.resolve("load").is_none());

        let replaced = actions.register("save", handler(|_| {})).unwrap();
        assert!(replaced.ptr_eq(&save));

        assert!(actions.unregister("save").is_some());
        assert!(actions.is_empty());
    }
}
