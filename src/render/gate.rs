//! The style injection gate: a before-construct hook between template code
//! and the host's element constructor.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::fragment::{DynamicValue, StyleFragment, StyleFragmentSequence};
use crate::host::{Child, ElementCall, Host, Namespace, PropValue, PropertyBag};
use crate::runtime::ScopeContext;
use crate::scope::scope_styles;

/// What the gate decided about an element-construction call.
#[derive(Debug)]
pub enum GateOutcome<N> {
    /// Pass the (possibly rewritten) call through to the host constructor.
    Construct(ElementCall<N>),
    /// The call was a style declaration: it was either materialized under
    /// the document head or suppressed as a duplicate. Either way it yields
    /// no node in the caller's child tree.
    Consumed,
}

/// Intercepts element construction to materialize scoped style declarations
/// and to stamp every other element with the current scope class.
///
/// A `<style local>` / `<style global>` call never reaches the caller's tree:
/// the gate computes a deduplication key from the current scope, the kind,
/// and an optional static class suffix, and materializes the element under
/// the document head at most once per key. Local declarations have their
/// selectors rewritten to the current scope first; global ones pass through
/// verbatim.
///
/// The gate owns the registry of materialized identifiers. When a scope's
/// last instance is torn down and its style elements leave the document, the
/// renderer calls [`forget`](Self::forget) so a later instance can re-insert
/// them.
#[derive(Debug, Default)]
pub struct StyleGate {
    seen: RefCell<HashSet<String>>,
}

impl StyleGate {
    /// Creates a gate with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspects one construction call and either rewrites it or consumes it.
    pub fn before_construct<H: Host>(
        &self,
        ctx: &ScopeContext,
        host: &H,
        mut call: ElementCall<H::Node>,
    ) -> GateOutcome<H::Node> {
        // `scoped` is accepted as an alias of `local`.
        let local = call.props.has_flag("local") || call.props.has_flag("scoped");
        let is_style_declaration = call.namespace == Namespace::Html
            && call.tag == "style"
            && (local || call.props.has_flag("global"));
        if !is_style_declaration {
            inject_scope_class(&ctx.current(), &mut call.props);
            return GateOutcome::Construct(call);
        }

        let scope = ctx.current();
        let key = style_key(&scope, local, call.props.text("class"));

        // Already materialized by this runtime, or an element with this
        // identifier predates us in the document: either way, idempotent.
        if self.seen.borrow().contains(&key) || host.has_element(&key) {
            return GateOutcome::Consumed;
        }
        self.seen.borrow_mut().insert(key.clone());

        // Tag the element with its scope so teardown can find it by class.
        let tagged_class = match call.props.text("class") {
            Some(existing) if !scope.is_empty() => format!("{scope} {existing}"),
            Some(existing) => existing.to_string(),
            None => scope.clone(),
        };
        if !tagged_class.is_empty() {
            call.props.set("class", PropValue::Text(tagged_class));
        }
        call.props.set("id", PropValue::Text(key));

        let children = if local {
            fragments_to_children(scope_styles(&style_fragments(&call.children), &scope))
        } else {
            call.children
        };

        let node = host
            .detached_root(|| host.construct(Namespace::Html, &call.tag, &call.props, children));
        host.append_to_head(node);
        GateOutcome::Consumed
    }

    /// Drops `id` from the registry so the declaration can be materialized
    /// again after its element left the document.
    pub fn forget(&self, id: &str) {
        self.seen.borrow_mut().remove(id);
    }

    /// True when `key` is currently registered.
    pub fn is_registered(&self, key: &str) -> bool {
        self.seen.borrow().contains(key)
    }
}

/// The deduplication identifier of a style declaration.
pub(crate) fn style_key(scope: &str, local: bool, class: Option<&str>) -> String {
    let kind = if local { "local" } else { "global" };
    match class {
        Some(class) if !class.is_empty() => format!("{scope}-{kind}-{class}"),
        _ => format!("{scope}-{kind}"),
    }
}

/// Appends the scope to an element's class property.
///
/// A dynamic class is wrapped in a new producer that re-reads the inner
/// value on every call but keeps the scope captured at wrap time.
pub(crate) fn inject_scope_class(scope: &str, props: &mut PropertyBag) {
    if scope.is_empty() {
        return;
    }
    let injected = match props.remove("class") {
        Some(PropValue::Text(base)) if !base.is_empty() => {
            PropValue::Text(format!("{base} {scope}"))
        }
        Some(PropValue::Dynamic(base)) => {
            let scope = scope.to_string();
            PropValue::Dynamic(DynamicValue::new(move || {
                format!("{} {}", base.get(), scope)
            }))
        }
        _ => PropValue::Text(scope.to_string()),
    };
    props.set("class", injected);
}

/// Extracts the textual style content of a declaration's children. Node and
/// producer children are not meaningful inside a style element and are
/// skipped.
fn style_fragments<N>(children: &[Child<N>]) -> StyleFragmentSequence {
    children
        .iter()
        .filter_map(|child| match child {
            Child::Text(text) => Some(StyleFragment::Text(text.clone())),
            Child::Dynamic(value) => Some(StyleFragment::Dynamic(value.clone())),
            _ => None,
        })
        .collect()
}

fn fragments_to_children<N>(fragments: StyleFragmentSequence) -> Vec<Child<N>> {
    fragments
        .into_iter()
        .map(|fragment| match fragment {
            StyleFragment::Text(text) => Child::Text(text),
            StyleFragment::Dynamic(value) => Child::Dynamic(value),
        })
        .collect()
}
