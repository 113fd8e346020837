//! Selector scoping: tokenization and scope-class injection.
//!
//! This module turns style content (text interleaved with dynamic values)
//! into typed tokens and rewrites every selector token to carry a scope
//! class:
//!
//! - [`tokenize`]: the finite-state scan producing [`Token`]s
//! - [`insert_scope_name`]: the per-selector string transform
//! - [`scope_selectors`] / [`scope_styles`]: re-serialization with scoping
//!
//! Rule bodies are opaque blobs here; selectors inside at-rule groups are
//! deliberately left alone.

mod scoper;
mod tokenize;

pub use scoper::{insert_scope_name, scope_selectors, scope_styles};
pub use tokenize::{tokenize, tokenize_with_diagnostics, Token, TokenDiagnostics, TokenKind};
