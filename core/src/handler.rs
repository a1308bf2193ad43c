//! Shared event handlers.
//!
//! Rendering is single-threaded, so handlers are reference counted rather
//! than atomically shared. The same handler may be attached to any number of
//! elements; cloning a [`Handler`] only bumps the count.

use core::{any::type_name, fmt::Debug};
use std::rc::Rc;

use crate::Event;

/// A reference-counted callback invoked when an event fires.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
    /// Wraps a closure into a [`Handler`].
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the handler with the provided event.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Returns `true` when both handlers wrap the same callback allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(type_name::<Self>())
    }
}

/// Convenience constructor for a [`Handler`].
pub fn handler(f: impl Fn(&Event) + 'static) -> Handler {
    Handler::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;
    use std::cell::Cell;

    #[test]
    fn clones_share_the_callback() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let first = handler(move |_| counter.set(counter.get() + 1));
        let second = first.clone();

        let event = Event::new("click", NodeId::new(0));
        first.call(&event);
        second.call(&event);

        assert_eq!(hits.get(), 2);
        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&handler(|_| {})));
    }
}
