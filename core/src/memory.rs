//! An in-memory render tree.
//!
//! [`MemoryHost`] stores every node in an arena addressed by [`NodeId`]. It
//! follows browser semantics where builders can observe them: names are
//! validated, HTML tag names are lower-cased, rendering boundaries hang off
//! their host element without being one of its children, and listeners fire
//! synchronously when an event is dispatched.

use core::fmt::Write as _;

use crate::{BoundaryMode, Event, Handler, HostError, ListenerId, NodeId, RenderHost, namespace};

/// Elements that may host a rendering boundary, besides custom elements.
const BOUNDARY_HOSTS: &[&str] = &[
    "article",
    "aside",
    "blockquote",
    "body",
    "div",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "main",
    "nav",
    "p",
    "section",
    "span",
];

/// Which setter wrote an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrSetter {
    /// The namespace-unaware setter.
    Plain,
    /// The namespaced setter, including calls with a null namespace.
    Namespaced,
    /// A metadata tag written through the dataset.
    Dataset,
}

/// A single attribute stored on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name.
    pub name: String,
    /// Attribute namespace, `None` for the null namespace.
    pub namespace: Option<String>,
    /// Attribute value.
    pub value: String,
    /// The setter that last wrote the attribute.
    pub setter: AttrSetter,
}

#[derive(Debug)]
struct ElementData {
    tag: String,
    namespace: String,
    attributes: Vec<Attribute>,
    boundary: Option<NodeId>,
}

#[derive(Debug)]
enum NodeKind {
    Element(ElementData),
    Text(String),
    Markup(String),
    Boundary { mode: BoundaryMode, host: NodeId },
}

#[derive(Debug)]
struct ListenerEntry {
    id: ListenerId,
    event_type: String,
    handler: Handler,
    node_id: Option<String>,
}

#[derive(Debug)]
struct NodeEntry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<ListenerEntry>,
    kind: NodeKind,
}

impl NodeEntry {
    const fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
            kind,
        }
    }
}

/// Arena-backed render tree with a `body` root container.
///
/// Nodes are never freed: torn-down elements stay in the arena until the host
/// is dropped, which suits tests and short-lived headless builds.
#[derive(Debug)]
pub struct MemoryHost {
    nodes: Vec<NodeEntry>,
    root: NodeId,
    next_listener: u64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Creates a host containing only the root container.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeEntry::new(NodeKind::Element(ElementData {
            tag: "body".to_string(),
            namespace: namespace::XHTML.to_string(),
            attributes: Vec::new(),
            boundary: None,
        }));
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
            next_listener: 0,
        }
    }

    /// Returns the total number of nodes ever created, including the root.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` when only the root container exists.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Returns the children of `id` in tree order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map_or(&[], |entry| entry.children.as_slice())
    }

    /// Returns the tag name of an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Returns the namespace of an element.
    #[must_use]
    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.namespace.as_str())
    }

    /// Returns the value of the attribute called `name`, in any namespace.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns every attribute of an element in insertion order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.element(id).map_or(&[], |el| el.attributes.as_slice())
    }

    /// Returns the rendering boundary attached to `id`.
    #[must_use]
    pub fn boundary(&self, id: NodeId) -> Option<NodeId> {
        self.element(id)?.boundary
    }

    /// Returns the mode of a rendering boundary node.
    #[must_use]
    pub fn boundary_mode(&self, id: NodeId) -> Option<BoundaryMode> {
        match self.nodes.get(id.index())?.kind {
            NodeKind::Boundary { mode, .. } => Some(mode),
            _ => None,
        }
    }

    /// Returns the element a rendering boundary is attached to.
    #[must_use]
    pub fn boundary_host(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes.get(id.index())?.kind {
            NodeKind::Boundary { host, .. } => Some(host),
            _ => None,
        }
    }

    /// Returns how many listeners are attached to `id`.
    #[must_use]
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.nodes.get(id.index()).map_or(0, |entry| entry.listeners.len())
    }

    /// Fires every listener for `event_type` on `id` in attachment order.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch(&self, id: NodeId, event_type: &str) -> usize {
        let Some(entry) = self.nodes.get(id.index()) else {
            return 0;
        };
        let matching: Vec<(Handler, Option<String>)> = entry
            .listeners
            .iter()
            .filter(|listener| listener.event_type == event_type)
            .map(|listener| (listener.handler.clone(), listener.node_id.clone()))
            .collect();
        for (handler, node_id) in &matching {
            handler.call(&Event::new(event_type, id).with_node_id(node_id.clone()));
        }
        matching.len()
    }

    /// Concatenates the text of every descendant text node.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    /// Serializes `id` and its subtree.
    ///
    /// Rendering boundaries are skipped, as in a normal tree traversal.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serializes the children of `id`. For a boundary, this is its hidden content.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes.get(id.index())?.kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry, HostError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(HostError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, HostError> {
        match &mut self.entry_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            _ => Err(HostError::NotAnElement(id)),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeEntry::new(kind));
        id
    }

    fn write_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        ns: Option<&str>,
        value: &str,
        setter: AttrSetter,
    ) -> Result<(), HostError> {
        let element = self.element_mut(id)?;
        if !namespace::is_valid_name(name) {
            return Err(HostError::InvalidName(name.to_string()));
        }
        let namespace = ns.map(str::to_string);
        if let Some(existing) = element
            .attributes
            .iter_mut()
            .find(|attr| attr.name == name && attr.namespace == namespace)
        {
            existing.value = value.to_string();
            existing.setter = setter;
        } else {
            element.attributes.push(Attribute {
                name: name.to_string(),
                namespace,
                value: value.to_string(),
                setter,
            });
        }
        Ok(())
    }

    fn clear_children(&mut self, id: NodeId) -> Result<(), HostError> {
        let children = core::mem::take(&mut self.entry_mut(id)?.children);
        for child in children {
            self.nodes[child.index()].parent = None;
        }
        Ok(())
    }

    fn replace_content(&mut self, id: NodeId, kind: NodeKind) -> Result<(), HostError> {
        match &mut self.entry_mut(id)?.kind {
            NodeKind::Text(existing) | NodeKind::Markup(existing) => {
                if let NodeKind::Text(s) | NodeKind::Markup(s) = kind {
                    *existing = s;
                }
                return Ok(());
            }
            NodeKind::Element(_) | NodeKind::Boundary { .. } => {}
        }
        self.clear_children(id)?;
        let content = self.push(kind);
        self.nodes[content.index()].parent = Some(id);
        self.nodes[id.index()].children.push(content);
        Ok(())
    }

    /// Walks up through parents and boundary hosts.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            let Some(entry) = self.nodes.get(node.index()) else {
                return false;
            };
            node = match (&entry.kind, entry.parent) {
                (_, Some(parent)) => parent,
                (NodeKind::Boundary { host, .. }, None) => *host,
                _ => return false,
            };
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(id.index()) else {
            return;
        };
        if let NodeKind::Text(text) = &entry.kind {
            out.push_str(text);
        }
        for &child in &entry.children {
            self.collect_text(child, out);
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(entry) = self.nodes.get(id.index()) else {
            return;
        };
        match &entry.kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Markup(markup) => out.push_str(markup),
            NodeKind::Boundary { .. } => {
                for &child in &entry.children {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for attr in &el.attributes {
                    let _ = write!(out, " {}=\"{}\"", attr.name, escape(&attr.value, true));
                }
                out.push('>');
                for &child in &entry.children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl RenderHost for MemoryHost {
    fn root(&self) -> NodeId {
        self.root
    }

    fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        if !namespace::is_valid_name(tag) {
            return Err(HostError::InvalidName(tag.to_string()));
        }
        Ok(self.push(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            namespace: namespace::XHTML.to_string(),
            attributes: Vec::new(),
            boundary: None,
        })))
    }

    fn create_element_ns(&mut self, ns: &str, tag: &str) -> Result<NodeId, HostError> {
        if !namespace::is_valid_name(tag) {
            return Err(HostError::InvalidName(tag.to_string()));
        }
        Ok(self.push(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            namespace: ns.to_string(),
            attributes: Vec::new(),
            boundary: None,
        })))
    }

    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.write_attribute(id, name, None, value, AttrSetter::Plain)
    }

    fn set_attribute_ns(
        &mut self,
        id: NodeId,
        ns: Option<&str>,
        name: &str,
        value: &str,
    ) -> Result<(), HostError> {
        self.write_attribute(id, name, ns, value, AttrSetter::Namespaced)
    }

    fn set_data(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), HostError> {
        let name = namespace::dataset_attribute(key);
        self.write_attribute(id, &name, None, value, AttrSetter::Dataset)
    }

    fn data(&self, id: NodeId, key: &str) -> Option<String> {
        let name = namespace::dataset_attribute(key);
        self.attribute(id, &name).map(str::to_string)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        if !self.contains(child) {
            return Err(HostError::UnknownNode(child));
        }
        match &self.entry_mut(parent)?.kind {
            NodeKind::Element(_) | NodeKind::Boundary { .. } => {}
            NodeKind::Text(_) | NodeKind::Markup(_) => return Err(HostError::NotAnElement(parent)),
        }
        if matches!(self.nodes[child.index()].kind, NodeKind::Boundary { .. }) {
            return Err(HostError::HierarchyRequest { parent, child });
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(HostError::HierarchyRequest { parent, child });
        }
        self.detach(child)?;
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<(), HostError> {
        let Some(parent) = self.entry_mut(id)?.parent.take() else {
            return Ok(());
        };
        self.nodes[parent.index()].children.retain(|&c| c != id);
        Ok(())
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index())?.parent
    }

    fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), HostError> {
        self.replace_content(id, NodeKind::Text(text.to_string()))
    }

    fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), HostError> {
        self.replace_content(id, NodeKind::Markup(html.to_string()))
    }

    fn attach_boundary(&mut self, id: NodeId, mode: BoundaryMode) -> Result<NodeId, HostError> {
        let element = self.element_mut(id)?;
        let can_host = element.namespace == namespace::XHTML
            && (BOUNDARY_HOSTS.contains(&element.tag.as_str()) || element.tag.contains('-'));
        if !can_host || element.boundary.is_some() {
            return Err(HostError::BoundaryUnsupported(id));
        }
        let boundary = self.push(NodeKind::Boundary { mode, host: id });
        self.element_mut(id)?.boundary = Some(boundary);
        Ok(boundary)
    }

    fn add_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: &Handler,
        node_id: Option<&str>,
    ) -> Result<ListenerId, HostError> {
        let listener = ListenerId::new(self.next_listener);
        self.entry_mut(id)?.listeners.push(ListenerEntry {
            id: listener,
            event_type: event_type.to_string(),
            handler: handler.clone(),
            node_id: node_id.map(str::to_string),
        });
        self.next_listener += 1;
        Ok(listener)
    }

    fn remove_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<(), HostError> {
        let entry = self.entry_mut(id)?;
        let before = entry.listeners.len();
        entry
            .listeners
            .retain(|l| !(l.id == listener && l.event_type == event_type));
        if entry.listeners.len() == before {
            return Err(HostError::UnknownListener(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn builds_and_serializes_a_tree() {
        let mut host = MemoryHost::new();
        let div = host.create_element("DIV").unwrap();
        let span = host.create_element("span").unwrap();
        host.set_data(div, "state", "box").unwrap();
        host.set_text_content(span, "a < b").unwrap();
        host.append_child(div, span).unwrap();
        host.append_child(host.root(), div).unwrap();

        assert_eq!(
            host.outer_html(div),
            r#"<div data-state="box"><span>a &lt; b</span></div>"#
        );
        assert_eq!(host.data(div, "state").as_deref(), Some("box"));
        assert_eq!(host.parent(div), Some(host.root()));
        assert_eq!(host.text_content(div), "a < b");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut host = MemoryHost::new();
        assert_eq!(
            host.create_element("not valid"),
            Err(HostError::InvalidName("not valid".to_string()))
        );
        let div = host.create_element("div").unwrap();
        assert!(host.set_attribute(div, "", "x").is_err());
    }

    #[test]
    fn appending_moves_and_rejects_cycles() {
        let mut host = MemoryHost::new();
        let a = host.create_element("div").unwrap();
        let b = host.create_element("div").unwrap();
        let c = host.create_element("p").unwrap();
        host.append_child(a, c).unwrap();
        host.append_child(b, c).unwrap();
        assert!(host.children(a).is_empty());
        assert_eq!(host.children(b), &[c]);

        host.append_child(a, b).unwrap();
        assert_eq!(
            host.append_child(c, a),
            Err(HostError::HierarchyRequest { parent: c, child: a })
        );
    }

    #[test]
    fn detach_is_idempotent() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        host.append_child(host.root(), div).unwrap();
        host.detach(div).unwrap();
        host.detach(div).unwrap();
        assert!(host.children(host.root()).is_empty());
        assert!(host.contains(div));
    }

    #[test]
    fn boundary_content_is_hidden_from_serialization() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        let boundary = host.attach_boundary(div, BoundaryMode::Closed).unwrap();
        let inner = host.create_element("p").unwrap();
        host.append_child(boundary, inner).unwrap();

        assert_eq!(host.outer_html(div), "<div></div>");
        assert_eq!(host.inner_html(boundary), "<p></p>");
        assert_eq!(host.boundary(div), Some(boundary));
        assert_eq!(host.boundary_mode(boundary), Some(BoundaryMode::Closed));
        assert_eq!(host.boundary_host(boundary), Some(div));
        assert!(host.attach_boundary(div, BoundaryMode::Open).is_err());

        let button = host.create_element("button").unwrap();
        assert!(host.attach_boundary(button, BoundaryMode::Open).is_err());
    }

    #[test]
    fn listeners_fire_until_removed() {
        let mut host = MemoryHost::new();
        let div = host.create_element("div").unwrap();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let handler = Handler::new(move |event| {
            assert_eq!(event.node_id(), Some("n1"));
            counter.set(counter.get() + 1);
        });

        let listener = host.add_listener(div, "click", &handler, Some("n1")).unwrap();
        assert_eq!(host.dispatch(div, "click"), 1);
        assert_eq!(host.dispatch(div, "keyup"), 0);

        host.remove_listener(div, "click", listener).unwrap();
        assert_eq!(host.dispatch(div, "click"), 0);
        assert_eq!(hits.get(), 1);
        assert_eq!(
            host.remove_listener(div, "click", listener),
            Err(HostError::UnknownListener(div))
        );
    }
}
