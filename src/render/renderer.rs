//! The template invocation surface.

use std::rc::Rc;

use crate::host::{Child, ElementCall, Host, Namespace, PropertyBag};
use crate::render::gate::{GateOutcome, StyleGate};
use crate::runtime::{ScopeContext, ScopeSpec, ScopedProducer};

struct RendererState<H: Host> {
    ctx: ScopeContext,
    gate: StyleGate,
    host: H,
}

impl<H: Host> RendererState<H> {
    /// Teardown for one template activation: drop the usage count and, when
    /// the scope has no live instances left, garbage-collect its styles.
    fn release_scope(&self, scope: &str) {
        if !self.ctx.release(scope) {
            return;
        }
        // The root scope tags nothing, so there is nothing to collect.
        if scope.is_empty() {
            return;
        }
        for id in self.host.remove_styles_with_class(scope) {
            self.gate.forget(&id);
        }
    }
}

/// Scoped rendering over a host templating engine.
///
/// The renderer interposes the [`StyleGate`] between template code and the
/// host's element constructor, and runs template callbacks under an explicit
/// [`ScopeContext`]. It is a cheap handle; clones share the context, gate
/// registry, and host.
///
/// The three invocation forms mirror the template surface of the markup
/// layer:
///
/// - [`render`](Self::render) shields the template from the caller's scope,
/// - [`render_inherited`](Self::render_inherited) reuses the caller's scope,
/// - [`render_scoped`](Self::render_scoped) establishes a named scope.
///
/// # Example
///
/// ```rust
/// use insular::{Child, MemoryHost, PropertyBag, ScopedRenderer};
///
/// let host = MemoryHost::new();
/// let ui = ScopedRenderer::new(host.clone());
///
/// let view = ui.render_scoped("card", |t| {
///     t.element(
///         "style",
///         PropertyBag::new().flag("local"),
///         vec![Child::text("p { margin: 0 }")],
///     );
///     t.element("p", PropertyBag::new(), vec![Child::text("hello")])
///         .unwrap()
/// });
///
/// assert!(view.has_class("card"));
/// let style = host.style_element("card-local").unwrap();
/// assert!(style.text_content().contains("p.card {"));
/// ```
pub struct ScopedRenderer<H: Host> {
    state: Rc<RendererState<H>>,
}

impl<H: Host> Clone for ScopedRenderer<H> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<H: Host> ScopedRenderer<H> {
    /// Wraps a host with a fresh scope context and style registry.
    pub fn new(host: H) -> Self {
        Self {
            state: Rc::new(RendererState {
                ctx: ScopeContext::new(),
                gate: StyleGate::new(),
                host,
            }),
        }
    }

    /// The scope context threaded through this renderer's calls.
    pub fn context(&self) -> &ScopeContext {
        &self.state.ctx
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.state.host
    }

    /// Runs a template with the root (empty) scope, shielding it from the
    /// enclosing scope.
    pub fn render<R>(&self, template: impl FnOnce(&Self) -> R) -> R {
        self.render_with(ScopeSpec::Root, template)
    }

    /// Runs a template under the enclosing scope unchanged. Useful for
    /// conditionals and other pass-through wrappers.
    pub fn render_inherited<R>(&self, template: impl FnOnce(&Self) -> R) -> R {
        self.render_with(ScopeSpec::Inherit, template)
    }

    /// Runs a template with `scope` established as the current scope.
    pub fn render_scoped<R>(&self, scope: &str, template: impl FnOnce(&Self) -> R) -> R {
        self.render_with(ScopeSpec::Named(scope.to_string()), template)
    }

    /// The general form behind the three entry points.
    ///
    /// Resolves the effective scope, counts the activation, and hands the
    /// host a teardown that un-counts it — removing the scope's style
    /// elements from the document when the last instance goes away. The host
    /// invokes the teardown exactly once, serialized with other scope
    /// mutations, when the enclosing reactive scope is disposed.
    pub fn render_with<R>(&self, spec: ScopeSpec, template: impl FnOnce(&Self) -> R) -> R {
        let scope = spec.resolve(&self.state.ctx);
        self.state.ctx.activate(&scope);

        let state = Rc::clone(&self.state);
        let released = scope.clone();
        self.state
            .host
            .on_cleanup(Box::new(move || state.release_scope(&released)));

        self.state.ctx.run_with(scope, || template(self))
    }

    /// Constructs an element through the style gate.
    ///
    /// Returns `None` when the call was a `local`/`global` style declaration:
    /// those are materialized under the document head (at most once per
    /// deduplication key) instead of joining the child tree. Every other
    /// element comes back with the current scope appended to its class.
    pub fn element(
        &self,
        tag: &str,
        props: PropertyBag,
        children: Vec<Child<H::Node>>,
    ) -> Option<H::Node> {
        self.construct_gated(ElementCall {
            namespace: Namespace::Html,
            tag: tag.to_string(),
            props,
            children,
        })
    }

    /// Constructs an SVG-namespace element through the style gate.
    ///
    /// The SVG namespace carries no style declarations, so the gate only
    /// injects the scope class.
    pub fn svg_element(
        &self,
        tag: &str,
        props: PropertyBag,
        children: Vec<Child<H::Node>>,
    ) -> Option<H::Node> {
        self.construct_gated(ElementCall {
            namespace: Namespace::Svg,
            tag: tag.to_string(),
            props,
            children,
        })
    }

    /// Wraps deferred child content with the scope current right here, so a
    /// component that later invokes it renders it under the scope it was
    /// written in rather than the component's own.
    pub fn child_producer(
        &self,
        producer: impl Fn() -> H::Node + 'static,
    ) -> ScopedProducer<H::Node> {
        ScopedProducer::capture(&self.state.ctx, producer)
    }

    fn construct_gated(&self, call: ElementCall<H::Node>) -> Option<H::Node> {
        let state = &self.state;
        match state.gate.before_construct(&state.ctx, &state.host, call) {
            GateOutcome::Construct(call) => Some(state.host.construct(
                call.namespace,
                &call.tag,
                &call.props,
                call.children,
            )),
            GateOutcome::Consumed => None,
        }
    }
}

impl<H: Host> std::fmt::Debug for ScopedRenderer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedRenderer")
            .field("ctx", &self.state.ctx)
            .finish()
    }
}
