//! The state bundle a render root owns.

use trellis_core::{Handler, ListenerId, NodeId, RenderHost};

use crate::{
    ActionRegistry, Completion, Config, ElementBuilder, ElementRegistry, EventRegistry,
    NodeDescription, NodeOutcome, Parent, RemovalMode, StructureCompiler,
};

/// Builder for [`RenderContext`].
#[derive(Debug, Default, Clone)]
pub struct ContextBuilder {
    config: Config,
    actions: ActionRegistry,
}

impl ContextBuilder {
    /// Creates a builder with default configuration and no actions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets the metadata tag that registers elements by key.
    #[must_use]
    pub fn with_state_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.state_tag = tag.into();
        self
    }

    /// Seeds the action registry.
    #[must_use]
    pub fn with_actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Finalises the builder around `host`.
    pub fn build<H: RenderHost>(self, host: H) -> RenderContext<H> {
        RenderContext {
            host,
            elements: ElementRegistry::with_state_tag(self.config.state_tag.clone()),
            events: EventRegistry::new(),
            actions: self.actions,
            config: self.config,
        }
    }
}

/// One render root: a host plus the registries that track what was built on it.
///
/// Independent contexts never share state, so several roots (or tests) can
/// coexist in one process.
#[derive(Debug)]
pub struct RenderContext<H: RenderHost> {
    host: H,
    elements: ElementRegistry,
    events: EventRegistry,
    actions: ActionRegistry,
    config: Config,
}

impl<H: RenderHost> RenderContext<H> {
    /// Creates a context with default configuration.
    pub fn new(host: H) -> Self {
        ContextBuilder::new().build(host)
    }

    /// Compiles `desc` under `parent`.
    pub fn compile(&mut self, desc: &NodeDescription, parent: Parent<'_>) -> NodeOutcome {
        self.compiler().compile(desc, parent)
    }

    /// Compiles `desc` under `parent`, then calls `on_complete` once.
    pub fn compile_with(
        &mut self,
        desc: &NodeDescription,
        parent: Parent<'_>,
        on_complete: impl FnOnce(&Completion),
    ) -> NodeOutcome {
        self.compiler().compile_with(desc, parent, on_complete)
    }

    /// Returns a compiler borrowing this context.
    pub fn compiler(&mut self) -> StructureCompiler<'_, H> {
        StructureCompiler::new(
            &mut self.host,
            &mut self.elements,
            &mut self.events,
            &self.actions,
            &self.config,
        )
    }

    /// Returns a single-element builder borrowing this context.
    pub fn element_builder(&mut self) -> ElementBuilder<'_, H> {
        ElementBuilder::new(&mut self.host, &mut self.elements)
    }

    /// Registers a listener through the event registry.
    pub fn register_event(
        &mut self,
        element: NodeId,
        event_type: &str,
        handler: &Handler,
        node_id: Option<&str>,
    ) -> Option<ListenerId> {
        self.events
            .register(&mut self.host, element, event_type, handler, node_id)
    }

    /// Tears `element` down. See [`EventRegistry::unregister_all`].
    pub fn unregister_all(&mut self, element: NodeId) {
        self.events
            .unregister_all(&mut self.host, &mut self.elements, element);
    }

    /// Removes `key` from the element registry. See [`ElementRegistry::remove`].
    pub fn remove_element(&mut self, key: &str, mode: RemovalMode) {
        self.elements
            .remove(key, mode, &mut self.events, &mut self.host);
    }

    /// Looks up the element registered under `key`.
    #[must_use]
    pub fn element(&self, key: &str) -> Option<NodeId> {
        self.elements.get(key)
    }

    /// Returns the host.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably.
    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the element registry.
    pub const fn elements(&self) -> &ElementRegistry {
        &self.elements
    }

    /// Returns the event registry.
    pub const fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Returns the action registry.
    pub const fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Returns the action registry mutably.
    pub const fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the context, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }
}
