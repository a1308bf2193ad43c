use core::{fmt, str::FromStr};
use std::collections::HashMap;

use trellis_core::{NodeId, RenderHost};

use super::EventRegistry;

/// The metadata tag name that registers an element by key.
pub const DEFAULT_STATE_TAG: &str = "state";

/// How [`ElementRegistry::remove`] treats the element behind a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalMode {
    /// Tear the element down: listeners, tree position and registry entry.
    #[default]
    Full,
    /// Forget the key only; the element and its listeners stay untouched.
    ReferenceOnly,
}

/// Error returned when parsing an unknown [`RemovalMode`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRemovalModeError(String);

impl fmt::Display for ParseRemovalModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown removal mode `{}`", self.0)
    }
}

impl std::error::Error for ParseRemovalModeError {}

impl FromStr for RemovalMode {
    type Err = ParseRemovalModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "reference-only" => Ok(Self::ReferenceOnly),
            other => Err(ParseRemovalModeError(other.to_string())),
        }
    }
}

/// Maps string keys to live elements.
///
/// At most one element is stored per key. Adding under an existing key
/// overwrites the entry without touching the element it pointed at.
#[derive(Debug)]
pub struct ElementRegistry {
    entries: HashMap<String, NodeId>,
    state_tag: String,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Creates an empty registry keyed by the default `state` tag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state_tag(DEFAULT_STATE_TAG)
    }

    /// Creates an empty registry keyed by a custom metadata tag.
    #[must_use]
    pub fn with_state_tag(state_tag: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            state_tag: state_tag.into(),
        }
    }

    /// The metadata tag whose value is used as registry key.
    #[must_use]
    pub fn state_tag(&self) -> &str {
        &self.state_tag
    }

    /// Stores `element` under `key`. Empty keys are ignored.
    pub fn add(&mut self, key: &str, element: NodeId) {
        if key.is_empty() {
            tracing::warn!(%element, "refusing to register element under an empty key");
            return;
        }
        if let Some(previous) = self.entries.insert(key.to_string(), element)
            && previous != element
        {
            tracing::debug!(key, %previous, %element, "element registry entry overwritten");
        }
    }

    /// Returns the element stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeId> {
        if key.is_empty() {
            return None;
        }
        self.entries.get(key).copied()
    }

    /// Removes `key` according to `mode`.
    ///
    /// [`RemovalMode::Full`] runs [`EventRegistry::unregister_all`] on the
    /// element currently stored under `key`, then drops the entry.
    pub fn remove<H: RenderHost + ?Sized>(
        &mut self,
        key: &str,
        mode: RemovalMode,
        events: &mut EventRegistry,
        host: &mut H,
    ) {
        if key.is_empty() {
            tracing::warn!("ignoring removal of an empty key");
            return;
        }
        match mode {
            RemovalMode::ReferenceOnly => {
                self.remove_reference(key);
            }
            RemovalMode::Full => {
                let Some(element) = self.get(key) else {
                    tracing::warn!(key, "no element registered under key");
                    return;
                };
                events.unregister_all(host, self, element);
                self.entries.remove(key);
            }
        }
    }

    /// Like [`ElementRegistry::remove`], with the mode given by name.
    ///
    /// Unknown mode names are logged and ignored.
    pub fn remove_named<H: RenderHost + ?Sized>(
        &mut self,
        key: &str,
        mode: &str,
        events: &mut EventRegistry,
        host: &mut H,
    ) {
        match mode.parse::<RemovalMode>() {
            Ok(mode) => self.remove(key, mode, events, host),
            Err(err) => tracing::warn!(key, %err, "ignoring removal"),
        }
    }

    /// Drops the entry for `key` and returns the element it pointed at.
    pub fn remove_reference(&mut self, key: &str) -> Option<NodeId> {
        self.entries.remove(key)
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the registered keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
