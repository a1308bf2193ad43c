//! The render surface every builder drives.

use crate::{BoundaryMode, Handler, HostError, ListenerId, NodeId};

/// A render tree that live elements are created in and attached to.
///
/// Handles are plain [`NodeId`]s. Detaching an element leaves it alive and
/// reusable, mirroring how a browser keeps a removed node around for as long
/// as something references it. Hosts keep every node they created in an
/// arena, so teardown through the registries does not free anything by
/// itself; hosts backed by external objects offer an explicit release (see
/// `WebHost::release` in `trellis-web`).
pub trait RenderHost {
    /// Returns the root container, the default attachment point.
    fn root(&self) -> NodeId;

    /// Returns `true` when `id` refers to a node owned by this host.
    fn contains(&self, id: NodeId) -> bool;

    /// Creates a detached element in the standard (HTML) namespace.
    ///
    /// # Errors
    ///
    /// Fails when `tag` is not a valid element name.
    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError>;

    /// Creates a detached element in `namespace`.
    ///
    /// # Errors
    ///
    /// Fails when `tag` is not a valid element name.
    fn create_element_ns(&mut self, namespace: &str, tag: &str) -> Result<NodeId, HostError>;

    /// Sets an attribute through the plain (namespace-unaware) setter.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes, non-elements and invalid attribute names.
    fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), HostError>;

    /// Sets an attribute through the namespaced setter.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes, non-elements and invalid attribute names.
    fn set_attribute_ns(
        &mut self,
        id: NodeId,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) -> Result<(), HostError>;

    /// Stores a metadata tag in the element's dataset.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes, non-elements and invalid keys.
    fn set_data(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), HostError>;

    /// Reads a metadata tag back from the element's dataset.
    fn data(&self, id: NodeId, key: &str) -> Option<String>;

    /// Appends `child` as the last child of `parent`, moving it if it was attached elsewhere.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes or when `parent` is inside `child`.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;

    /// Removes `id` from its parent. Detaching a detached node does nothing.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes.
    fn detach(&mut self, id: NodeId) -> Result<(), HostError>;

    /// Returns the parent of `id`, if it is attached.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Replaces the children of `id` with a single text node.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes.
    fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), HostError>;

    /// Replaces the children of `id` with raw markup.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes or markup the host rejects.
    fn set_inner_html(&mut self, id: NodeId, html: &str) -> Result<(), HostError>;

    /// Attaches an isolated rendering boundary to `id` and returns it.
    ///
    /// # Errors
    ///
    /// Fails when the element already has a boundary or cannot host one.
    fn attach_boundary(&mut self, id: NodeId, mode: BoundaryMode) -> Result<NodeId, HostError>;

    /// Attaches a non-capturing listener for `event_type`.
    ///
    /// # Errors
    ///
    /// Fails for unknown nodes.
    fn add_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        handler: &Handler,
        node_id: Option<&str>,
    ) -> Result<ListenerId, HostError>;

    /// Detaches a listener previously returned by [`RenderHost::add_listener`].
    ///
    /// # Errors
    ///
    /// Fails when the listener is not attached to `id`.
    fn remove_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> Result<(), HostError>;
}
