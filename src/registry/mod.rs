//! Lookup tables tying live elements to keys and listeners.

mod elements;
mod events;

pub use elements::{DEFAULT_STATE_TAG, ElementRegistry, ParseRemovalModeError, RemovalMode};
pub use events::{EventRegistry, Registration};
