//! Event payloads and rendering boundary modes.

use crate::NodeId;

/// The payload handed to a listener when its event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    event_type: String,
    target: NodeId,
    node_id: Option<String>,
}

impl Event {
    /// Creates a new event of `event_type` targeting `target`.
    #[must_use]
    pub fn new(event_type: impl Into<String>, target: NodeId) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            node_id: None,
        }
    }

    /// Attaches the caller-chosen node identifier declared alongside the event.
    #[must_use]
    pub fn with_node_id(mut self, node_id: Option<String>) -> Self {
        self.node_id = node_id;
        self
    }

    /// Returns the event type, such as `click`.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Returns the element the listener was attached to.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the declared node identifier, if any.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }
}

/// Visibility of an isolated rendering boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundaryMode {
    /// Boundary contents are reachable from outside through the host element.
    Open,
    /// Boundary contents are only reachable through the handle returned on attach.
    Closed,
}

impl BoundaryMode {
    /// Returns the lowercase name used by markup and browser APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}
