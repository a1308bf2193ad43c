//! Build failures.
//!
//! Nothing in this crate propagates a failure past the node it happened on.
//! Each node's [`NodeOutcome`](crate::NodeOutcome) carries the error instead,
//! so a malformed subtree never aborts its siblings.

use trellis_core::HostError;

/// Why a node could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The description has no element type.
    #[error("node description has no element type")]
    MissingElementType,
    /// The element could not be constructed or configured.
    #[error("failed to construct `{element_type}`: {source}")]
    Construction {
        /// The element type being built.
        element_type: String,
        /// The host failure.
        source: HostError,
    },
    /// The element was built but could not be attached to its parent.
    #[error("failed to attach `{element_type}`: {source}")]
    Attachment {
        /// The element type being attached.
        element_type: String,
        /// The host failure.
        source: HostError,
    },
    /// Text or markup content could not be applied.
    #[error("failed to set content: {source}")]
    Content {
        /// The host failure.
        source: HostError,
    },
    /// The requested rendering boundary could not be attached.
    #[error("failed to attach rendering boundary: {source}")]
    Boundary {
        /// The host failure.
        source: HostError,
    },
}

impl BuildError {
    pub(crate) fn construction(element_type: &str, source: HostError) -> Self {
        Self::Construction {
            element_type: element_type.to_string(),
            source,
        }
    }

    pub(crate) fn attachment(element_type: &str, source: HostError) -> Self {
        Self::Attachment {
            element_type: element_type.to_string(),
            source,
        }
    }
}
