//! Scope runtime: the current-scope stack, usage counting, and lexical
//! propagation for deferred children.
//!
//! The context is an explicit handle rather than process-wide state; the
//! renderer threads one context through every construction call, and clones
//! of the handle observe the same stack and counters.

mod context;
mod lexical;

pub use context::{ScopeContext, ScopeSpec};
pub use lexical::ScopedProducer;
