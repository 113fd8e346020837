//! Selector rewriting: injecting a scope class into tokenized style content.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::fragment::{StyleFragment, StyleFragmentSequence};
use crate::scope::tokenize::{tokenize, Token};

/// Characters that end the tag/element prefix of a simple selector. The
/// scope class is inserted immediately before the first of these.
static SELECTOR_MARKERS: Lazy<HashSet<char>> =
    Lazy::new(|| ['#', '.', ':', '['].into_iter().collect());

/// Inserts `scope` as a class after the tag prefix of `selector`.
///
/// The selector is split at the first `#`, `.`, `:`, or `[`; the scope class
/// lands between the tag prefix (possibly empty) and the remainder. This is a
/// plain string transform with no CSS validation.
///
/// # Example
///
/// ```rust
/// use insular::insert_scope_name;
///
/// assert_eq!(insert_scope_name("div.foo", "s1"), "div.s1.foo");
/// assert_eq!(insert_scope_name(".foo", "s1"), ".s1.foo");
/// assert_eq!(insert_scope_name("div", "s1"), "div.s1");
/// assert_eq!(insert_scope_name("div:hover", "s1"), "div.s1:hover");
/// ```
pub fn insert_scope_name(selector: &str, scope: &str) -> String {
    let split = selector
        .char_indices()
        .find(|&(_, ch)| SELECTOR_MARKERS.contains(&ch))
        .map(|(index, _)| index)
        .unwrap_or(selector.len());
    let (tag, rest) = selector.split_at(split);
    format!("{tag}.{scope}{rest}")
}

/// Re-serializes a token list with every selector scoped to `scope`.
///
/// Selector tokens are rewritten via [`insert_scope_name`]; rule blocks,
/// commas, at-rule preludes, whitespace, and combinators pass through
/// verbatim. Dynamic tokens close the current text section and stand alone,
/// so the result alternates text and dynamic values exactly like the input
/// the tokens came from.
pub fn scope_selectors(tokens: Vec<Token>, scope: &str) -> StyleFragmentSequence {
    let mut sections = Vec::new();
    let mut current = String::new();
    for token in tokens {
        match token {
            Token::Selector(text) => current.push_str(&insert_scope_name(&text, scope)),
            Token::Dynamic(value) => {
                sections.push(StyleFragment::Text(std::mem::take(&mut current)));
                sections.push(StyleFragment::Dynamic(value));
            }
            other => {
                // kind() never yields Dynamic here, so text() is always set
                if let Some(text) = other.text() {
                    current.push_str(text);
                }
            }
        }
    }
    sections.push(StyleFragment::Text(current));
    sections
}

/// Scopes a style fragment sequence in one step.
///
/// Tokenizes `styles` and rewrites every selector to carry `scope`, returning
/// a sequence of the same alternating shape.
///
/// # Example
///
/// ```rust
/// use insular::{scope_styles, StyleFragment};
///
/// let scoped = scope_styles(&[StyleFragment::text("div.card { margin: 0 }")], "s1");
/// assert_eq!(scoped[0].as_text(), Some("div.s1.card { margin: 0 }"));
/// ```
pub fn scope_styles(styles: &[StyleFragment], scope: &str) -> StyleFragmentSequence {
    scope_selectors(tokenize(styles), scope)
}
