use std::collections::HashMap;

use trellis_core::{Handler, ListenerId, NodeId, RenderHost};

use super::ElementRegistry;

/// One listener attached through the [`EventRegistry`].
#[derive(Debug, Clone)]
pub struct Registration {
    event_type: String,
    handler: Handler,
    node_id: Option<String>,
    listener: ListenerId,
}

impl Registration {
    /// The event type the listener reacts to.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The attached handler.
    #[must_use]
    pub const fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The node identifier declared with the event.
    #[must_use]
    pub fn node_id(&self) -> Option<&str> {
        self.node_id.as_deref()
    }

    /// The host-side listener handle.
    #[must_use]
    pub const fn listener(&self) -> ListenerId {
        self.listener
    }
}

/// Maps live elements to the listeners attached to them, in registration order.
///
/// An element without listeners has no entry at all.
#[derive(Debug, Default)]
pub struct EventRegistry {
    entries: HashMap<NodeId, Vec<Registration>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `handler` to `element` for `event_type` and records it.
    ///
    /// Registrations are never de-duplicated. Returns `None`, after logging,
    /// when the element is unknown, the type is empty, or the host refuses
    /// the listener.
    pub fn register<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        element: NodeId,
        event_type: &str,
        handler: &Handler,
        node_id: Option<&str>,
    ) -> Option<ListenerId> {
        if event_type.is_empty() {
            tracing::warn!(%element, "skipping event registration without a type");
            return None;
        }
        if !host.contains(element) {
            tracing::warn!(%element, event_type, "skipping event registration on unknown element");
            return None;
        }
        let listener = match host.add_listener(element, event_type, handler, node_id) {
            Ok(listener) => listener,
            Err(err) => {
                tracing::warn!(%element, event_type, %err, "failed to attach listener");
                return None;
            }
        };
        self.entries.entry(element).or_default().push(Registration {
            event_type: event_type.to_string(),
            handler: handler.clone(),
            node_id: node_id.map(str::to_string),
            listener,
        });
        tracing::debug!(%element, event_type, "listener registered");
        Some(listener)
    }

    /// Tears `element` down.
    ///
    /// Detaches every recorded listener (latest first) and drops the entry,
    /// removes the element from its parent, and forgets the key found in the
    /// element's own state tag. Calling this on an element that is already
    /// torn down does nothing.
    pub fn unregister_all<H: RenderHost + ?Sized>(
        &mut self,
        host: &mut H,
        elements: &mut ElementRegistry,
        element: NodeId,
    ) {
        if let Some(registrations) = self.entries.remove(&element) {
            for registration in registrations.iter().rev() {
                if let Err(err) =
                    host.remove_listener(element, &registration.event_type, registration.listener)
                {
                    tracing::warn!(%element, event_type = %registration.event_type, %err, "failed to detach listener");
                }
            }
        }
        if let Err(err) = host.detach(element) {
            tracing::warn!(%element, %err, "failed to detach element");
        }
        if let Some(key) = host.data(element, elements.state_tag()) {
            elements.remove_reference(&key);
        }
    }

    /// Returns the registrations for `element`, if it has any.
    #[must_use]
    pub fn registrations(&self, element: NodeId) -> Option<&[Registration]> {
        self.entries.get(&element).map(Vec::as_slice)
    }

    /// Returns `true` when `element` has at least one registration.
    #[must_use]
    pub fn is_registered(&self, element: NodeId) -> bool {
        self.entries.contains_key(&element)
    }

    /// Returns how many elements have registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no element has registrations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};
    use trellis_core::{MemoryHost, handler};

    fn counter() -> (Rc<Cell<u32>>, Handler) {
        let hits = Rc::new(Cell::new(0));
        let inner = hits.clone();
        (hits, handler(move |_| inner.set(inner.get() + 1)))
    }

    #[test]
    fn duplicate_registrations_are_all_attached() {
        let mut host = MemoryHost::new();
        let el = host.create_element("button").unwrap();
        let mut events = EventRegistry::new();
        let (hits, on_click) = counter();

        events.register(&mut host, el, "click", &on_click, None);
        events.register(&mut host, el, "click", &on_click, Some("again"));

        assert_eq!(host.dispatch(el, "click"), 2);
        assert_eq!(hits.get(), 2);
        let recorded = events.registrations(el).unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].node_id(), Some("again"));
    }

    #[test]
    fn incomplete_registrations_are_skipped() {
        let mut host = MemoryHost::new();
        let el = host.create_element("button").unwrap();
        let mut events = EventRegistry::new();
        let (_, on_click) = counter();

        assert_eq!(events.register(&mut host, el, "", &on_click, None), None);
        assert_eq!(
            events.register(&mut host, NodeId::new(99), "click", &on_click, None),
            None
        );
        assert!(events.is_empty());
        assert_eq!(events.registrations(el).map(<[_]>::len), None);
    }

    #[test]
    fn unregister_all_detaches_everything_and_is_idempotent() {
        let mut host = MemoryHost::new();
        let el = host.create_element("div").unwrap();
        host.append_child(host.root(), el).unwrap();
        host.set_data(el, "state", "panel").unwrap();

        let mut elements = ElementRegistry::new();
        elements.add("panel", el);
        let mut events = EventRegistry::new();
        let (clicks, on_click) = counter();
        let (keys, on_key) = counter();
        events.register(&mut host, el, "click", &on_click, None);
        events.register(&mut host, el, "keydown", &on_key, None);

        host.dispatch(el, "click");
        host.dispatch(el, "keydown");
        assert_eq!((clicks.get(), keys.get()), (1, 1));

        events.unregister_all(&mut host, &mut elements, el);
        assert_eq!(host.listener_count(el), 0);
        assert_eq!(host.parent(el), None);
        assert_eq!(elements.get("panel"), None);
        assert!(!events.is_registered(el));

        events.unregister_all(&mut host, &mut elements, el);
        assert_eq!(host.dispatch(el, "click"), 0);
    }

    #[test]
    fn unregister_all_without_listeners_still_detaches() {
        let mut host = MemoryHost::new();
        let el = host.create_element("p").unwrap();
        host.append_child(host.root(), el).unwrap();
        let mut elements = ElementRegistry::new();
        let mut events = EventRegistry::new();

        events.unregister_all(&mut host, &mut elements, el);
        assert!(host.children(host.root()).is_empty());
    }
}
