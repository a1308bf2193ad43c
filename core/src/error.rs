//! Errors raised by render hosts.

use crate::NodeId;

/// Failure of a single host operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The handle does not refer to a node owned by this host.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// The node exists but cannot take part in the requested operation.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// An element or attribute name is not a valid markup name.
    #[error("invalid name `{0}`")]
    InvalidName(String),
    /// Appending would make a node its own ancestor.
    #[error("cannot append {child} under its descendant {parent}")]
    HierarchyRequest {
        /// The node that was to receive the child.
        parent: NodeId,
        /// The node being appended.
        child: NodeId,
    },
    /// The element already hosts a rendering boundary or cannot host one.
    #[error("cannot attach a rendering boundary to {0}")]
    BoundaryUnsupported(NodeId),
    /// The listener was never attached to this node.
    #[error("listener is not attached to {0}")]
    UnknownListener(NodeId),
    /// An exception thrown by the underlying JavaScript engine.
    #[error("JavaScript error: {0}")]
    Js(String),
}
