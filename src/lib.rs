//! Scoped CSS for declarative UI templates.
//!
//! This crate rewrites the selectors of style declarations so their rules
//! only apply within a named scope, and manages the runtime lifecycle of the
//! resulting style elements: creation, deduplication, reference counting,
//! and removal when the last user of a scope goes away.
//!
//! It is not a CSS engine. The host templating layer — element construction,
//! reactivity, the document — stays behind the [`Host`] trait; this crate
//! supplies the pieces in between:
//!
//! - **Selector scoping** ([`tokenize`], [`insert_scope_name`],
//!   [`scope_styles`]): a small finite-state scan that splits style text
//!   (interleaved with [`DynamicValue`] producers) into tokens and injects a
//!   scope class into every selector, treating `{ ... }` rule bodies as
//!   opaque blobs.
//! - **Scope runtime** ([`ScopeContext`], [`ScopedProducer`]): an explicit
//!   current-scope stack with usage counting, plus lexical scope capture for
//!   deferred children passed between components.
//! - **Style injection** ([`StyleGate`], [`ScopedRenderer`]): a
//!   before-construct hook that materializes `<style local>` / `<style
//!   global>` declarations under the document head exactly once per
//!   deduplication key, and stamps every other element with the current
//!   scope class.
//!
//! # Example
//!
//! ```rust
//! use insular::{Child, MemoryHost, PropertyBag, ScopedRenderer};
//!
//! let host = MemoryHost::new();
//! let ui = ScopedRenderer::new(host.clone());
//!
//! let view = ui.render_scoped("card", |t| {
//!     t.element(
//!         "style",
//!         PropertyBag::new().flag("local"),
//!         vec![Child::text("p { margin: 0 }")],
//!     );
//!     t.element("p", PropertyBag::new(), vec![Child::text("hello")])
//!         .unwrap()
//! });
//!
//! // The paragraph carries the scope class...
//! assert!(view.has_class("card"));
//! // ...and the style landed in the head, selectors rewritten.
//! let style = host.style_element("card-local").unwrap();
//! assert_eq!(style.text_content(), "p.card { margin: 0 }");
//!
//! // Teardown of the last "card" instance removes the style again.
//! host.dispose_all();
//! assert!(host.style_element("card-local").is_none());
//! ```
//!
//! # Known limitations
//!
//! - Style text with unbalanced braces produces unspecified tokens; see
//!   [`tokenize_with_diagnostics`].
//! - A dynamic value in selector position produces unspecified output.
//! - Everything here is single-threaded by design; handles are `Rc`-based
//!   and not `Send`.

mod fragment;
mod host;
mod render;
mod runtime;
mod scope;

pub use fragment::{DynamicValue, StyleFragment, StyleFragmentSequence};
pub use host::{
    Child, ElementCall, Host, MemoryHost, MemoryNode, Namespace, PropValue, PropertyBag,
};
pub use render::{GateOutcome, ScopedRenderer, StyleGate};
pub use runtime::{ScopeContext, ScopeSpec, ScopedProducer};
pub use scope::{
    insert_scope_name, scope_selectors, scope_styles, tokenize, tokenize_with_diagnostics, Token,
    TokenDiagnostics, TokenKind,
};
