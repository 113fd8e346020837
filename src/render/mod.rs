//! Rendering: the style injection gate and the template invocation surface.
//!
//! [`StyleGate`] decides what happens to each element-construction call;
//! [`ScopedRenderer`] threads the scope context through template callbacks
//! and wires teardown into the host's disposal mechanism.

mod gate;
mod renderer;

pub use gate::{GateOutcome, StyleGate};
pub use renderer::ScopedRenderer;
