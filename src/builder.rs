//! Materializing single nodes.
//!
//! [`ElementBuilder`] turns one [`NodeDescription`] into a live element on a
//! [`RenderHost`] and attaches it. Each step is guarded on its own: a failure
//! is logged and returned as a [`BuildError`], never raised past the node.

use trellis_core::{BoundaryMode, NodeId, RenderHost, namespace};

use crate::{BuildError, ElementRegistry, NodeDescription};

/// Where a freshly built element should be attached.
#[derive(Debug, Clone, Copy, Default)]
pub enum Parent<'a> {
    /// An existing element or boundary.
    Element(NodeId),
    /// A description of the parent, built on the spot.
    Description(&'a NodeDescription),
    /// No parent: standard elements fall back to the root container.
    #[default]
    None,
}

impl From<NodeId> for Parent<'_> {
    fn from(value: NodeId) -> Self {
        Self::Element(value)
    }
}

impl<'a> From<&'a NodeDescription> for Parent<'a> {
    fn from(value: &'a NodeDescription) -> Self {
        Self::Description(value)
    }
}

/// An attached standard element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attached {
    /// The element that was built.
    pub element: NodeId,
    /// Where children go: the rendering boundary if one was requested, else the element.
    pub attach_point: NodeId,
}

/// Builds and attaches single elements.
#[derive(Debug)]
pub struct ElementBuilder<'a, H: RenderHost + ?Sized> {
    host: &'a mut H,
    elements: &'a mut ElementRegistry,
}

impl<'a, H: RenderHost + ?Sized> ElementBuilder<'a, H> {
    /// Creates a builder writing to `host` and registering tagged elements in `elements`.
    pub const fn new(host: &'a mut H, elements: &'a mut ElementRegistry) -> Self {
        Self { host, elements }
    }

    /// Constructs a standard element with its attributes and metadata tags.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingElementType`] or [`BuildError::Construction`] when the
    /// host rejects the element type, an attribute or a metadata tag.
    pub fn build_standard(&mut self, desc: &NodeDescription) -> Result<NodeId, BuildError> {
        let element_type = desc.element_type().ok_or(BuildError::MissingElementType)?;
        let element = self
            .host
            .create_element(element_type)
            .map_err(|err| construction_failed(element_type, err))?;
        for (name, value) in desc.attributes.iter() {
            self.host
                .set_attribute(element, name, value)
                .map_err(|err| construction_failed(element_type, err))?;
        }
        self.apply_metadata(element, element_type, desc)?;
        tracing::debug!(element_type, %element, "built element");
        Ok(element)
    }

    /// Constructs an element in `ns`, setting every attribute through the namespaced setter.
    ///
    /// Plain attributes use the null namespace; namespaced attributes take
    /// their namespace from the name prefix (`xlink:`, `xml:`, `xmlns`).
    ///
    /// # Errors
    ///
    /// As for [`ElementBuilder::build_standard`].
    pub fn build_namespaced(
        &mut self,
        ns: &str,
        desc: &NodeDescription,
    ) -> Result<NodeId, BuildError> {
        let element_type = desc.element_type().ok_or(BuildError::MissingElementType)?;
        let element = self
            .host
            .create_element_ns(ns, element_type)
            .map_err(|err| construction_failed(element_type, err))?;
        for (name, value) in desc.attributes.iter() {
            self.host
                .set_attribute_ns(element, None, name, value)
                .map_err(|err| construction_failed(element_type, err))?;
        }
        for (name, value) in desc.namespaced_attributes.iter() {
            self.host
                .set_attribute_ns(element, namespace::for_attribute(name), name, value)
                .map_err(|err| construction_failed(element_type, err))?;
        }
        self.apply_metadata(element, element_type, desc)?;
        tracing::debug!(element_type, ns, %element, "built namespaced element");
        Ok(element)
    }

    /// Builds a standard element and attaches it.
    ///
    /// The parent is resolved in order: a live element, a parent description
    /// built on the spot, then the root container. When `boundary` is set and
    /// the element carries a state tag, the element registered under that key
    /// gets a rendering boundary and children attach inside it.
    ///
    /// # Errors
    ///
    /// Construction, [`BuildError::Attachment`] or [`BuildError::Boundary`] failures.
    pub fn attach_standard(
        &mut self,
        parent: Parent<'_>,
        desc: &NodeDescription,
        boundary: Option<BoundaryMode>,
    ) -> Result<Attached, BuildError> {
        let element = self.build_standard(desc)?;
        let element_type = desc.element_type().unwrap_or_default();

        let target = match parent {
            Parent::Element(id) if self.host.contains(id) => id,
            Parent::Element(id) => {
                tracing::warn!(%id, "parent is not a live element, using the root container");
                self.host.root()
            }
            Parent::Description(parent_desc) => match self.build_standard(parent_desc) {
                Ok(built) => built,
                Err(err) => {
                    tracing::warn!(%err, "could not build parent, using the root container");
                    self.host.root()
                }
            },
            Parent::None => self.host.root(),
        };
        self.append(target, element, element_type)
            .inspect_err(|_| self.forget(element))?;

        let Some(mode) = boundary else {
            return Ok(Attached {
                element,
                attach_point: element,
            });
        };
        let Some(key) = self.host.data(element, self.elements.state_tag()) else {
            tracing::debug!(element_type, "rendering boundary requested without a state tag, ignoring");
            return Ok(Attached {
                element,
                attach_point: element,
            });
        };
        let boundary_host = self.elements.get(&key).unwrap_or(element);
        let attach_point = self
            .host
            .attach_boundary(boundary_host, mode)
            .map_err(|source| {
                tracing::warn!(element_type, key = %key, %source, "failed to attach rendering boundary");
                BuildError::Boundary { source }
            })?;
        tracing::debug!(element_type, key = %key, mode = mode.as_str(), "rendering boundary attached");
        Ok(Attached {
            element,
            attach_point,
        })
    }

    /// Builds an element in `ns` and attaches it.
    ///
    /// Parent resolution is the same as [`ElementBuilder::attach_standard`]
    /// except that there is no root fallback: without a parent the element
    /// stays unattached.
    ///
    /// # Errors
    ///
    /// Construction or [`BuildError::Attachment`] failures.
    pub fn attach_namespaced(
        &mut self,
        ns: &str,
        parent: Parent<'_>,
        desc: &NodeDescription,
    ) -> Result<NodeId, BuildError> {
        let element = self.build_namespaced(ns, desc)?;
        let element_type = desc.element_type().unwrap_or_default();

        let target = match parent {
            Parent::Element(id) if self.host.contains(id) => Some(id),
            Parent::Element(id) => {
                tracing::warn!(%id, "parent is not a live element, leaving element unattached");
                None
            }
            Parent::Description(parent_desc) => self
                .build_namespaced(ns, parent_desc)
                .inspect_err(|err| tracing::warn!(%err, "could not build parent"))
                .ok(),
            Parent::None => None,
        };
        if let Some(target) = target {
            self.append(target, element, element_type)
                .inspect_err(|_| self.forget(element))?;
        }
        Ok(element)
    }

    fn apply_metadata(
        &mut self,
        element: NodeId,
        element_type: &str,
        desc: &NodeDescription,
    ) -> Result<(), BuildError> {
        let mut key = None;
        for (name, value) in desc.metadata_tags.iter() {
            self.host
                .set_data(element, name, value)
                .map_err(|err| construction_failed(element_type, err))?;
            if name == self.elements.state_tag() {
                key = Some(value);
            }
        }
        // only fully tagged elements are registered
        if let Some(key) = key {
            self.elements.add(key, element);
        }
        Ok(())
    }

    /// Drops the registry entry of an element that failed to attach, unless the
    /// key has since moved to another element.
    fn forget(&mut self, element: NodeId) {
        let Some(key) = self.host.data(element, self.elements.state_tag()) else {
            return;
        };
        if self.elements.get(&key) == Some(element) {
            self.elements.remove_reference(&key);
        }
    }

    fn append(&mut self, parent: NodeId, element: NodeId, element_type: &str) -> Result<(), BuildError> {
        self.host.append_child(parent, element).map_err(|err| {
            tracing::warn!(element_type, %parent, %err, "failed to attach element");
            BuildError::attachment(element_type, err)
        })
    }
}

fn construction_failed(element_type: &str, err: trellis_core::HostError) -> BuildError {
    tracing::warn!(element_type, %err, "failed to construct element");
    BuildError::construction(element_type, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{AttrSetter, HostError, MemoryHost};

    #[test]
    fn standard_build_applies_attributes_and_registers_state() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let desc = NodeDescription::new("div")
            .attribute("class", "card")
            .metadata("state", "card")
            .metadata("role", "panel");

        let el = ElementBuilder::new(&mut host, &mut elements)
            .build_standard(&desc)
            .unwrap();

        assert_eq!(host.attribute(el, "class"), Some("card"));
        assert_eq!(host.data(el, "role").as_deref(), Some("panel"));
        assert_eq!(elements.get("card"), Some(el));
        assert_eq!(host.parent(el), None);
    }

    #[test]
    fn invalid_element_type_is_a_construction_failure() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let result = ElementBuilder::new(&mut host, &mut elements)
            .build_standard(&NodeDescription::new("no spaces"));
        assert_eq!(
            result,
            Err(BuildError::Construction {
                element_type: "no spaces".to_string(),
                source: HostError::InvalidName("no spaces".to_string()),
            })
        );
    }

    #[test]
    fn namespaced_build_never_uses_the_plain_setter() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let desc = NodeDescription::new("use")
            .attribute("width", "4")
            .namespaced_attribute("xlink:href", "#dot");

        let el = ElementBuilder::new(&mut host, &mut elements)
            .build_namespaced(namespace::SVG, &desc)
            .unwrap();

        assert_eq!(host.namespace(el), Some(namespace::SVG));
        let attrs = host.attributes(el);
        assert!(attrs.iter().all(|a| a.setter == AttrSetter::Namespaced));
        assert_eq!(attrs[0].namespace, None);
        assert_eq!(attrs[1].namespace.as_deref(), Some(namespace::XLINK));
    }

    #[test]
    fn standard_parent_resolution() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let mut builder = ElementBuilder::new(&mut host, &mut elements);

        let live = builder
            .attach_standard(Parent::None, &NodeDescription::new("main"), None)
            .unwrap();
        let inside = builder
            .attach_standard(live.element.into(), &NodeDescription::new("p"), None)
            .unwrap();
        let stale = builder
            .attach_standard(Parent::Element(NodeId::new(500)), &NodeDescription::new("em"), None)
            .unwrap();
        let wrapper = NodeDescription::new("figure");
        let described = builder
            .attach_standard((&wrapper).into(), &NodeDescription::new("img"), None)
            .unwrap();

        let root = host.root();
        assert_eq!(host.parent(live.element), Some(root));
        assert_eq!(host.parent(inside.element), Some(live.element));
        assert_eq!(host.parent(stale.element), Some(root));
        let figure = host.parent(described.element).unwrap();
        assert_eq!(host.tag_name(figure), Some("figure"));
    }

    #[test]
    fn namespaced_without_parent_stays_unattached() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let el = ElementBuilder::new(&mut host, &mut elements)
            .attach_namespaced(namespace::SVG, Parent::None, &NodeDescription::new("svg"))
            .unwrap();
        assert_eq!(host.parent(el), None);
        assert!(host.children(host.root()).is_empty());
    }

    #[test]
    fn boundary_replaces_the_attach_point() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let desc = NodeDescription::new("section").metadata("state", "widget");

        let attached = ElementBuilder::new(&mut host, &mut elements)
            .attach_standard(Parent::None, &desc, Some(BoundaryMode::Open))
            .unwrap();

        assert_ne!(attached.attach_point, attached.element);
        assert_eq!(host.boundary(attached.element), Some(attached.attach_point));
        assert_eq!(host.boundary_mode(attached.attach_point), Some(BoundaryMode::Open));
        assert_eq!(elements.get("widget"), Some(attached.element));
    }

    #[test]
    fn failed_metadata_leaves_no_registry_entry() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let desc = NodeDescription::new("div")
            .metadata("state", "ghost")
            .metadata("bad key", "x");

        let result = ElementBuilder::new(&mut host, &mut elements).build_standard(&desc);

        assert!(matches!(result, Err(BuildError::Construction { .. })));
        assert_eq!(elements.get("ghost"), None);
    }

    #[test]
    fn failed_attachment_leaves_no_registry_entry() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let mut builder = ElementBuilder::new(&mut host, &mut elements);
        let label = builder
            .attach_standard(Parent::None, &NodeDescription::new("p").metadata("state", "label"), None)
            .unwrap();
        builder.host.set_text_content(label.element, "text").unwrap();
        let text = builder.host.children(label.element)[0];

        let standard = builder.attach_standard(
            Parent::Element(text),
            &NodeDescription::new("div").metadata("state", "ghost"),
            None,
        );
        let namespaced = builder.attach_namespaced(
            namespace::SVG,
            Parent::Element(text),
            &NodeDescription::new("svg").metadata("state", "shape"),
        );

        assert!(matches!(standard, Err(BuildError::Attachment { .. })));
        assert!(matches!(namespaced, Err(BuildError::Attachment { .. })));
        assert_eq!(elements.get("ghost"), None);
        assert_eq!(elements.get("shape"), None);
        assert_eq!(elements.get("label"), Some(label.element));
    }

    #[test]
    fn boundary_without_state_tag_is_ignored() {
        let mut host = MemoryHost::new();
        let mut elements = ElementRegistry::new();
        let attached = ElementBuilder::new(&mut host, &mut elements)
            .attach_standard(Parent::None, &NodeDescription::new("div"), Some(BoundaryMode::Closed))
            .unwrap();
        assert_eq!(attached.attach_point, attached.element);
        assert_eq!(host.boundary(attached.element), None);
    }
}
