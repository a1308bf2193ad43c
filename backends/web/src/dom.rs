use std::collections::HashMap;

use trellis_core::{
    BoundaryMode, Event, Handler, HostError, ListenerId, NodeId, RenderHost, namespace,
};
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, Element, Node, ShadowRoot, ShadowRootInit, ShadowRootMode, Window};

use crate::error::{WebError, js};

const HOST_ELEMENT_ID: &str = "trellis-root";

struct ListenerSlot {
    node: NodeId,
    event_type: String,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// A [`RenderHost`] driving a live browser document.
///
/// Every node created through the host is kept in an arena so that handles
/// stay valid after detaching. The arena holds a JS reference to each node,
/// so a torn-down node is only collected once [`WebHost::release`] drops it.
/// Listener closures are owned by the host until they are removed.
pub struct WebHost {
    document: Document,
    nodes: Vec<Option<Node>>,
    parents: Vec<Option<NodeId>>,
    listeners: HashMap<ListenerId, ListenerSlot>,
    next_listener: u64,
}

impl core::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebHost")
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl WebHost {
    /// Creates a host mounted on the element with `root_id`, or on a fresh
    /// `div` appended to `<body>` when no id is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM is unavailable or the root element cannot be found.
    pub fn new(root_id: Option<&str>) -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;

        let element = if let Some(id) = root_id {
            document
                .get_element_by_id(id)
                .ok_or_else(|| WebError::RootNotFound(id.to_string()))?
        } else {
            let body = document.body().ok_or(WebError::DomUnavailable)?;
            let host = document.create_element("div")?;
            host.set_id(HOST_ELEMENT_ID);
            body.append_child(&host)?;
            host
        };

        Ok(Self {
            document,
            nodes: vec![Some(element.into())],
            parents: vec![None],
            listeners: HashMap::new(),
            next_listener: 0,
        })
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the DOM node behind a handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())?.as_ref()
    }

    /// Returns the DOM element behind a handle, if it is an element.
    #[must_use]
    pub fn dom_element(&self, id: NodeId) -> Option<&Element> {
        self.node(id)?.dyn_ref::<Element>()
    }

    /// Removes every child of the root container.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser refuses to remove a child.
    pub fn clear(&self) -> Result<(), WebError> {
        let root = self.node(self.root()).ok_or(WebError::DomUnavailable)?;
        while let Some(child) = root.first_child() {
            root.remove_child(&child)?;
        }
        Ok(())
    }

    /// Detaches `id`, removes its listeners and drops the host's reference to
    /// the DOM node so the browser can collect it.
    ///
    /// The handle is dead afterwards: every operation on it reports
    /// [`HostError::UnknownNode`]. Releasing the root, or a handle that is
    /// already gone, returns `false`.
    pub fn release(&mut self, id: NodeId) -> bool {
        if id == self.root() || !self.contains(id) {
            return false;
        }
        if let Err(err) = RenderHost::detach(self, id) {
            tracing::warn!(%id, %err, "failed to detach released node");
        }
        let owned: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, slot)| slot.node == id)
            .map(|(listener, _)| *listener)
            .collect();
        let node = self.nodes[id.index()].take();
        for listener in owned {
            let (Some(slot), Some(node)) = (self.listeners.remove(&listener), node.as_ref()) else {
                continue;
            };
            if let Err(err) = node.remove_event_listener_with_callback(
                &slot.event_type,
                slot.closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!(%id, ?err, "failed to remove listener of released node");
            }
        }
        self.parents[id.index()] = None;
        tracing::debug!(%id, "released node");
        true
    }

    fn lookup(&self, id: NodeId) -> Result<&Node, HostError> {
        self.node(id).ok_or(HostError::UnknownNode(id))
    }

    fn lookup_element(&self, id: NodeId) -> Result<&Element, HostError> {
        self.lookup(id)?
            .dyn_ref::<Element>()
            .ok_or(HostError::NotAnElement(id))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(node));
        self.parents.push(None);
        id
    }
}

fn check_name(name: &str) -> Result<(), HostError> {
    if namespace::is_valid_name(name) {
        Ok(())
    } else {
        Err(HostError::InvalidName(name.to_string()))
    }
}

const fn shadow_mode(mode: BoundaryMode) -> ShadowRootMode {
    match mode {
        BoundaryMode::Open => ShadowRootMode::Open,
        BoundaryMode::Closed => ShadowRootMode::Closed,
    }
}

impl RenderHost for WebHost {
    fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        check_name(tag)?;
        let element = self.document.create_element(tag).map_err(js)?;
        Ok(self.push(element.into()))
    }

    fn create_element_ns(&mut self, ns: &str, tag: &str) -> Result<NodeId, HostError> {
        check_name(tag)?;
        let element = self
            .document
            .create_element_ns(Some(ns), tag)
            .map_err(js)?;
        Ok(self.push(element.into()))
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        check_name(name)?;
        self.lookup_element(id)?
            .set_attribute(name, value)
            .map_err(js)
    }

    fn set_attribute_ns(
        &mut self,
        id: NodeId,
        ns: Option<&str>,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        check_name(name)?;
        self.lookup_element(id)?
            .set_attribute_ns(ns, name, value)
            .map_err(js)
    }

    fn set_data(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), HostError> {
        let name = namespace::dataset_attribute(key);
        check_name(&name)?;
        self.lookup_element(id)?
            .set_attribute(&name, value)
            .map_err(js)
    }

    fn data(&self, id: NodeId, key: &str) -> Option<String> {
        self.dom_element(id)?
            .get_attribute(&namespace::dataset_attribute(key))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let node = self.lookup(child)?;
        self.lookup(parent)?.append_child(node).map_err(js)?;
        self.parents[child.index()] = Some(parent);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<(), HostError> {
        let node = self.lookup(id)?;
        if let Some(parent) = node.parent_node() {
            parent.remove_child(node).map_err(js)?;
        }
        self.parents[id.index()] = None;
        Ok(())
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent_node()?;
        // the recorded parent is trusted only while the DOM still agrees with it
        let recorded = self.parents.get(id.index()).copied().flatten();
        if let Some(recorded) = recorded.filter(|&p| self.node(p) == Some(&parent)) {
            return Some(recorded);
        }
        self.nodes
            .iter()
            .position(|node| node.as_ref() == Some(&parent))
            .map(NodeId::new)
    }

    fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), HostError> {
        self.lookup(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), HostError> {
        let node = self.lookup(id)?;
        if let Some(element) = node.dyn_ref::<Element>() {
            element.set_inner_html(html);
        } else if let Some(boundary) = node.dyn_ref::<ShadowRoot>() {
            boundary.set_inner_html(html);
        } else {
            return Err(HostError::NotAnElement(id));
        }
        Ok(())
    }

    fn attach_boundary(&mut self, id: NodeId, mode: BoundaryMode) -> Result<NodeId, HostError> {
        let element = self.lookup_element(id)?;
        let init = ShadowRootInit::new(shadow_mode(mode));
        let boundary = element
            .attach_shadow(&init)
            .map_err(|_| HostError::BoundaryUnsupported(id))?;
        Ok(self.push(boundary.into()))
    }

    fn add_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: &Handler,
        node_id: Option<&str>,
    ) -> Result<ListenerId, HostError> {
        let node = self.lookup(id)?;
        let handler = handler.clone();
        let event = Event::new(event_type, id).with_node_id(node_id.map(str::to_string));
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            handler.call(&event);
        });
        node.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
            .map_err(js)?;

        let listener = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(
            listener,
            ListenerSlot {
                node: id,
                event_type: event_type.to_string(),
                closure,
            },
        );
        Ok(listener)
    }

    fn remove_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<(), HostError> {
        let matches = self
            .listeners
            .get(&listener)
            .is_some_and(|slot| slot.node == id && slot.event_type == event_type);
        if !matches {
            return Err(HostError::UnknownListener(id));
        }
        let Some(slot) = self.listeners.remove(&listener) else {
            return Err(HostError::UnknownListener(id));
        };
        self.lookup(id)?
            .remove_event_listener_with_callback(event_type, slot.closure.as_ref().unchecked_ref())
            .map_err(js)
    }
}
