#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Render host abstraction for `trellis`.
//!
//! A [`RenderHost`] is the surface that live elements are created on and
//! attached to. Builders never touch a concrete DOM directly; they address
//! elements through copyable [`NodeId`] handles and drive the host through
//! this trait. [`MemoryHost`] is an in-memory render tree that behaves like a
//! browser document closely enough for headless tooling and tests, while
//! browser backends map the same operations onto `web-sys`.

pub mod error;
pub mod event;
pub mod handler;
pub mod host;
pub mod id;
pub mod memory;
pub mod namespace;

pub use error::HostError;
pub use event::{BoundaryMode, Event};
pub use handler::{Handler, handler};
pub use host::RenderHost;
pub use id::{ListenerId, NodeId};
pub use memory::{AttrSetter, Attribute, MemoryHost};
