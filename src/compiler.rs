//! Compiling description trees.
//!
//! [`StructureCompiler`] walks a [`NodeDescription`] depth-first, parent
//! before children, in declared order. Each node is built through
//! [`ElementBuilder`], gets its content and declared event, and becomes the
//! parent of its children. A failed node aborts its own subtree only; the
//! failure is recorded in that node's [`NodeOutcome`].

use trellis_core::{NodeId, RenderHost, namespace};

use crate::{
    ActionRegistry, BuildError, Config, ElementBuilder, ElementRegistry, EventRegistry,
    NodeDescription, Parent,
};

/// Element types that switch to a namespaced builder, matched case-insensitively.
const NAMESPACED_ROOTS: &[(&str, &str)] = &[("svg", namespace::SVG), ("math", namespace::MATHML)];

/// Element types whose children return to the standard builder.
const NAMESPACE_EXITS: &[&str] = &["foreignObject"];

/// The builder strategy used for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderKind {
    /// HTML elements, attached with a root-container fallback.
    #[default]
    Standard,
    /// Elements in a markup namespace such as SVG.
    Namespaced(&'static str),
}

impl BuilderKind {
    /// Resolves the strategy for `element_type` given the strategy inherited from its parent.
    #[must_use]
    pub fn resolve(element_type: &str, inherited: Self) -> Self {
        NAMESPACED_ROOTS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(element_type))
            .map_or(inherited, |&(_, ns)| Self::Namespaced(ns))
    }

    /// The strategy children of an `element_type` node inherit.
    #[must_use]
    pub fn for_children(self, element_type: &str) -> Self {
        match self {
            Self::Namespaced(_)
                if NAMESPACE_EXITS
                    .iter()
                    .any(|exit| exit.eq_ignore_ascii_case(element_type)) =>
            {
                Self::Standard
            }
            other => other,
        }
    }
}

/// What happened to a node's declared event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventWiring {
    /// A listener was attached.
    Registered,
    /// The declaration lacked a type or action name, or the host refused the listener.
    Skipped,
    /// The action name is not in the action registry.
    UnresolvedAction(String),
}

/// Result of compiling one node.
pub type NodeOutcome = Result<CompiledNode, BuildError>;

/// A node that was built and attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledNode {
    /// The live element.
    pub element: NodeId,
    /// Where the children were attached.
    pub attach_point: NodeId,
    /// The builder strategy that produced the element.
    pub kind: BuilderKind,
    /// Outcome of the declared event, if one was declared.
    pub event: Option<EventWiring>,
    /// Child outcomes in declared order.
    pub children: Vec<NodeOutcome>,
}

impl CompiledNode {
    /// Collects every failure in this subtree, in depth-first order.
    #[must_use]
    pub fn failures(&self) -> Vec<&BuildError> {
        let mut out = Vec::new();
        self.collect_failures(&mut out);
        out
    }

    /// Collects every built element in this subtree, parent before children.
    #[must_use]
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<&'a BuildError>) {
        for child in &self.children {
            match child {
                Ok(node) => node.collect_failures(out),
                Err(err) => out.push(err),
            }
        }
    }

    fn collect_elements(&self, out: &mut Vec<NodeId>) {
        out.push(self.element);
        for node in self.children.iter().flatten() {
            node.collect_elements(out);
        }
    }
}

/// Signal passed to the completion callback once per top-level compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The top-level element, if it was built.
    pub root: Option<NodeId>,
    /// Number of failed nodes in the tree, including the top level.
    pub failures: usize,
}

impl Completion {
    /// Summarizes a top-level outcome.
    #[must_use]
    pub fn of(outcome: &NodeOutcome) -> Self {
        match outcome {
            Ok(node) => Self {
                root: Some(node.element),
                failures: node.failures().len(),
            },
            Err(_) => Self {
                root: None,
                failures: 1,
            },
        }
    }
}

/// Builds whole description trees.
#[derive(Debug)]
pub struct StructureCompiler<'a, H: RenderHost + ?Sized> {
    host: &'a mut H,
    elements: &'a mut ElementRegistry,
    events: &'a mut EventRegistry,
    actions: &'a ActionRegistry,
    config: &'a Config,
}

impl<'a, H: RenderHost + ?Sized> StructureCompiler<'a, H> {
    /// Creates a compiler over the given host and registries.
    pub const fn new(
        host: &'a mut H,
        elements: &'a mut ElementRegistry,
        events: &'a mut EventRegistry,
        actions: &'a ActionRegistry,
        config: &'a Config,
    ) -> Self {
        Self {
            host,
            elements,
            events,
            actions,
            config,
        }
    }

    /// Compiles `desc` under `parent`.
    pub fn compile(&mut self, desc: &NodeDescription, parent: Parent<'_>) -> NodeOutcome {
        self.compile_with(desc, parent, |_| {})
    }

    /// Compiles `desc` under `parent`, then calls `on_complete` exactly once.
    pub fn compile_with(
        &mut self,
        desc: &NodeDescription,
        parent: Parent<'_>,
        on_complete: impl FnOnce(&Completion),
    ) -> NodeOutcome {
        let outcome = self.compile_node(desc, parent, BuilderKind::Standard);
        let completion = Completion::of(&outcome);
        tracing::debug!(root = ?completion.root, failures = completion.failures, "compile finished");
        on_complete(&completion);
        outcome
    }

    fn compile_node(
        &mut self,
        desc: &NodeDescription,
        parent: Parent<'_>,
        inherited: BuilderKind,
    ) -> NodeOutcome {
        let Some(element_type) = desc.element_type() else {
            tracing::debug!("skipping node description without an element type");
            return Err(BuildError::MissingElementType);
        };

        let kind = BuilderKind::resolve(element_type, inherited);
        let mut builder = ElementBuilder::new(&mut *self.host, &mut *self.elements);
        let (element, attach_point) = match kind {
            BuilderKind::Standard => {
                let attached = builder.attach_standard(parent, desc, desc.render_boundary_mode)?;
                (attached.element, attached.attach_point)
            }
            BuilderKind::Namespaced(ns) => {
                if desc.render_boundary_mode.is_some() {
                    tracing::debug!(element_type, "namespaced elements cannot host a rendering boundary");
                }
                let element = builder.attach_namespaced(ns, parent, desc)?;
                (element, element)
            }
        };

        // content belongs inside the boundary; listeners stay on the host element
        self.apply_content(attach_point, element_type, desc)?;
        let event = self.wire_event(element, desc);

        let child_kind = kind.for_children(element_type);
        let children = desc
            .children
            .iter()
            .map(|child| self.compile_node(child, Parent::Element(attach_point), child_kind))
            .collect();

        Ok(CompiledNode {
            element,
            attach_point,
            kind,
            event,
            children,
        })
    }

    fn apply_content(
        &mut self,
        element: NodeId,
        element_type: &str,
        desc: &NodeDescription,
    ) -> Result<(), BuildError> {
        let result = match (&desc.text, &desc.html_content) {
            (Some(text), html) => {
                if html.is_some() && self.config.warn_on_mixed_content {
                    tracing::warn!(element_type, "node declares both text and html, using text");
                }
                self.host.set_text_content(element, text)
            }
            (None, Some(html)) => self.host.set_inner_html(element, html),
            (None, None) => return Ok(()),
        };
        result.map_err(|source| {
            tracing::warn!(element_type, %source, "failed to set content");
            BuildError::Content { source }
        })
    }

    fn wire_event(&mut self, element: NodeId, desc: &NodeDescription) -> Option<EventWiring> {
        let event = desc.event.as_ref()?;
        if event.event_type.is_empty() || event.action_name.is_empty() {
            tracing::warn!(%element, "event declaration needs both a type and an action name");
            return Some(EventWiring::Skipped);
        }
        let Some(handler) = self.actions.resolve(&event.action_name) else {
            tracing::debug!(%element, action = %event.action_name, "action not registered, no listener attached");
            return Some(EventWiring::UnresolvedAction(event.action_name.clone()));
        };
        let registered = self.events.register(
            &mut *self.host,
            element,
            &event.event_type,
            handler,
            event.node_id.as_deref(),
        );
        Some(if registered.is_some() {
            EventWiring::Registered
        } else {
            EventWiring::Skipped
        })
    }
}
