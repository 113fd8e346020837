//! Lexically scoped deferred producers.

use std::fmt;
use std::rc::Rc;

use crate::runtime::context::ScopeContext;

/// A deferred producer paired with the scope that was current where it was
/// created.
///
/// Child content handed to a component is written in the caller's markup, so
/// it must render under the caller's scope — not under whatever scope the
/// receiving component happens to be in when it finally invokes the producer.
/// Capturing the scope at creation and re-establishing it around every
/// invocation makes the scoping lexical instead of dynamic.
///
/// # Example
///
/// ```rust
/// use insular::{ScopeContext, ScopedProducer};
///
/// let ctx = ScopeContext::new();
/// let producer = ctx.run_with("caller", || {
///     ScopedProducer::capture(&ctx, {
///         let ctx = ctx.clone();
///         move || ctx.current()
///     })
/// });
///
/// // Invoked under a different scope, the producer still sees "caller".
/// let seen = ctx.run_with("component", || producer.call());
/// assert_eq!(seen, "caller");
/// ```
pub struct ScopedProducer<R> {
    scope: String,
    ctx: ScopeContext,
    producer: Rc<dyn Fn() -> R>,
}

impl<R> ScopedProducer<R> {
    /// Pairs `producer` with the scope currently in effect on `ctx`.
    pub fn capture(ctx: &ScopeContext, producer: impl Fn() -> R + 'static) -> Self {
        Self {
            scope: ctx.current(),
            ctx: ctx.clone(),
            producer: Rc::new(producer),
        }
    }

    /// Invokes the producer with its recorded scope re-established.
    pub fn call(&self) -> R {
        let producer = Rc::clone(&self.producer);
        self.ctx.run_with(self.scope.clone(), move || producer())
    }

    /// The scope recorded at creation.
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl<R> Clone for ScopedProducer<R> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            ctx: self.ctx.clone(),
            producer: Rc::clone(&self.producer),
        }
    }
}

impl<R> fmt::Debug for ScopedProducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedProducer")
            .field("scope", &self.scope)
            .finish()
    }
}
