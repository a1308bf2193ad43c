#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod actions;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod context;
pub mod description;
/// Build failures recorded per node.
pub mod error;
pub mod logging;
pub mod registry;

pub use actions::ActionRegistry;
pub use builder::{Attached, ElementBuilder, Parent};
pub use compiler::{BuilderKind, CompiledNode, Completion, EventWiring, NodeOutcome, StructureCompiler};
pub use config::Config;
pub use context::{ContextBuilder, RenderContext};
pub use description::{EventDescription, NodeDescription, Pairs};
pub use error::BuildError;
pub use registry::{ElementRegistry, EventRegistry, Registration, RemovalMode};

#[doc(inline)]
pub use trellis_core::{
    AttrSetter, Attribute, BoundaryMode, Event, Handler, HostError, ListenerId, MemoryHost, NodeId,
    RenderHost, handler, namespace,
};

pub mod prelude {
    //! A collection of commonly used types for easy importing.
    //!
    //! ```rust
    //! use trellis::prelude::*;
    //!
    //! let mut ctx = RenderContext::new(MemoryHost::new());
    //! let outcome = ctx.compile(&NodeDescription::new("div"), Parent::None);
    //! assert!(outcome.is_ok());
    //! ```
    pub use super::{
        ActionRegistry, BoundaryMode, ContextBuilder, EventDescription, MemoryHost, NodeDescription, Parent,
        RemovalMode, RenderContext, RenderHost, handler,
    };
}
