//! The scope context: current scope and live-usage counting.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// How a template invocation chooses its effective scope.
///
/// Mirrors the three call forms of the template surface: a bare render call
/// blocks the outer scope, an argument-less curried call propagates it, and a
/// named call establishes a fresh scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSpec {
    /// Force the root (empty) scope, shielding children from the caller's.
    Root,
    /// Reuse the enclosing scope unchanged.
    Inherit,
    /// Establish the named scope.
    Named(String),
}

impl ScopeSpec {
    pub(crate) fn resolve(&self, ctx: &ScopeContext) -> String {
        match self {
            ScopeSpec::Root => String::new(),
            ScopeSpec::Inherit => ctx.current(),
            ScopeSpec::Named(name) => name.clone(),
        }
    }
}

#[derive(Default)]
struct ContextState {
    current: String,
    usage: HashMap<String, usize>,
}

/// Tracks the scope in effect and how many live template instances use each
/// scope name.
///
/// A context is a cheap handle over shared single-threaded state; clones see
/// the same current scope and counters. The scope is mutated only by
/// [`run_with`](Self::run_with), which restores the previous value when the
/// callback returns — including on unwind — so nested template invocations
/// behave like a stack.
///
/// # Example
///
/// ```rust
/// use insular::ScopeContext;
///
/// let ctx = ScopeContext::new();
/// assert_eq!(ctx.current(), "");
///
/// ctx.run_with("card", || {
///     assert_eq!(ctx.current(), "card");
///     ctx.run_with("badge", || assert_eq!(ctx.current(), "badge"));
///     assert_eq!(ctx.current(), "card");
/// });
/// assert_eq!(ctx.current(), "");
/// ```
#[derive(Clone, Default)]
pub struct ScopeContext {
    state: Rc<RefCell<ContextState>>,
}

impl ScopeContext {
    /// Creates a context with the root (empty) scope current.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scope currently in effect; `""` when none.
    pub fn current(&self) -> String {
        self.state.borrow().current.clone()
    }

    /// Runs `callback` with `scope` current, restoring the previous scope
    /// afterwards.
    ///
    /// Restoration happens in a drop guard, so the previous scope comes back
    /// even if `callback` panics.
    pub fn run_with<R>(&self, scope: impl Into<String>, callback: impl FnOnce() -> R) -> R {
        let _guard = ScopeGuard::enter(self, scope.into());
        callback()
    }

    /// Records one more live instance under `scope`.
    pub fn activate(&self, scope: &str) {
        let mut state = self.state.borrow_mut();
        *state.usage.entry(scope.to_string()).or_insert(0) += 1;
    }

    /// Records that one instance under `scope` was torn down.
    ///
    /// Returns `true` when this was the last instance: the entry is removed
    /// and the caller should garbage-collect style elements tagged with
    /// `scope`. Releasing a scope with no live instances is a no-op.
    pub fn release(&self, scope: &str) -> bool {
        let mut state = self.state.borrow_mut();
        let count = match state.usage.get(scope) {
            Some(count) => *count,
            None => return false,
        };
        if count > 1 {
            state.usage.insert(scope.to_string(), count - 1);
            false
        } else {
            state.usage.remove(scope);
            true
        }
    }

    /// Returns the live-instance count for `scope` (zero when absent).
    pub fn usage(&self, scope: &str) -> usize {
        self.state.borrow().usage.get(scope).copied().unwrap_or(0)
    }
}

impl std::fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ScopeContext")
            .field("current", &state.current)
            .field("usage", &state.usage)
            .finish()
    }
}

/// Restores the saved scope when dropped.
struct ScopeGuard {
    state: Rc<RefCell<ContextState>>,
    saved: String,
}

impl ScopeGuard {
    fn enter(ctx: &ScopeContext, scope: String) -> Self {
        let saved = {
            let mut state = ctx.state.borrow_mut();
            std::mem::replace(&mut state.current, scope)
        };
        Self {
            state: Rc::clone(&ctx.state),
            saved,
        }
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.state.borrow_mut().current = std::mem::take(&mut self.saved);
    }
}
