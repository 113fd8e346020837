//! Style text fragments and dynamic value producers.
//!
//! Style content arrives from the templating layer as an ordered mix of
//! literal text and deferred value producers, e.g. the markup
//! `p { color: ${() => theme.accent} }` becomes
//! `[Text("p { color: "), Dynamic(..), Text(" }")]`. The scoping transform
//! preserves that alternating shape: producers are never evaluated or merged
//! with surrounding text, only repositioned between rewritten text sections.

use std::fmt;
use std::rc::Rc;

/// A deferred, re-evaluatable value embedded in style or class content.
///
/// Wraps a zero-argument closure producing the value's current textual form.
/// Handles are cheap to clone and compare by identity, so a producer can be
/// carried through tokenization and scoping untouched and still be recognized
/// as the same producer on the other side.
///
/// # Example
///
/// ```rust
/// use insular::DynamicValue;
///
/// let accent = DynamicValue::new(|| "rebeccapurple".to_string());
/// assert_eq!(accent.get(), "rebeccapurple");
/// assert_eq!(accent, accent.clone());
/// ```
#[derive(Clone)]
pub struct DynamicValue(Rc<dyn Fn() -> String>);

impl DynamicValue {
    /// Wraps a producer closure.
    pub fn new(producer: impl Fn() -> String + 'static) -> Self {
        Self(Rc::new(producer))
    }

    /// Evaluates the producer and returns its current value.
    pub fn get(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamicValue(..)")
    }
}

impl PartialEq for DynamicValue {
    /// Identity equality: two handles are equal when they share a producer.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DynamicValue {}

/// One element of a style content sequence: literal text or a producer.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleFragment {
    /// A literal run of CSS-like text.
    Text(String),
    /// An embedded dynamic value, expected only inside rule bodies.
    Dynamic(DynamicValue),
}

impl StyleFragment {
    /// Creates a text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        StyleFragment::Text(text.into())
    }

    /// Creates a dynamic fragment from a producer closure.
    pub fn dynamic(producer: impl Fn() -> String + 'static) -> Self {
        StyleFragment::Dynamic(DynamicValue::new(producer))
    }

    /// Returns the literal text, if this is a text fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleFragment::Text(text) => Some(text),
            StyleFragment::Dynamic(_) => None,
        }
    }
}

impl From<&str> for StyleFragment {
    fn from(text: &str) -> Self {
        StyleFragment::Text(text.to_string())
    }
}

impl From<String> for StyleFragment {
    fn from(text: String) -> Self {
        StyleFragment::Text(text)
    }
}

impl From<DynamicValue> for StyleFragment {
    fn from(value: DynamicValue) -> Self {
        StyleFragment::Dynamic(value)
    }
}

/// Ordered style content: text sections interleaved with dynamic values.
pub type StyleFragmentSequence = Vec<StyleFragment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_value_evaluates() {
        let value = DynamicValue::new(|| "red".to_string());
        assert_eq!(value.get(), "red");
    }

    #[test]
    fn test_dynamic_value_identity_equality() {
        let a = DynamicValue::new(|| "x".to_string());
        let b = DynamicValue::new(|| "x".to_string());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_fragment_conversions() {
        assert_eq!(
            StyleFragment::from("p {}"),
            StyleFragment::Text("p {}".to_string())
        );
        assert_eq!(StyleFragment::text("p {}").as_text(), Some("p {}"));
        assert_eq!(StyleFragment::dynamic(|| String::new()).as_text(), None);
    }
}
