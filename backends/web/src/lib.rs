#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Browser backend for `trellis`.
//!
//! [`WebHost`] implements [`trellis_core::RenderHost`] on top of `web-sys`,
//! so the same description trees that compile against the in-memory host
//! produce real DOM nodes when running on `wasm32-unknown-unknown`.

mod dom;
mod error;
pub mod logging;

pub use dom::WebHost;
pub use error::WebError;
