//! Tokenizer for style content mixed with dynamic values.
//!
//! This is deliberately not a CSS parser. A single left-to-right scan with
//! one brace-depth counter splits the input into just enough structure for
//! selector rewriting: selectors, at-rule preludes, commas, combinators,
//! whitespace, and opaque `{ ... }` rule blocks. Everything inside a rule
//! block (nested braces from at-rule groups included) stays one undivided
//! token, so selectors nested inside at-rule bodies are never rewritten.
//!
//! Dynamic values are expected only inside rule bodies. A dynamic value in
//! selector position produces unspecified output; it is not detected.
//!
//! # Known limitations
//!
//! - Unbalanced braces are not recovered from: the dangling rule-block buffer
//!   is flushed as-is at end of input. [`tokenize_with_diagnostics`] reports
//!   how many blocks stayed open.
//! - `;` does not terminate an at-rule prelude, so statement-style at-rules
//!   (`@import ...;`) absorb the following text up to the next `{`.

use crate::fragment::{DynamicValue, StyleFragment};

/// The syntactic class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An opaque `{ ... }` rule body, nested braces included.
    RuleBlock,
    /// A standalone `,` between selectors.
    Comma,
    /// An `@`-rule prelude, up to its opening brace.
    AtRule,
    /// A run of spaces, tabs, and line breaks.
    Whitespace,
    /// A standalone combinator: `>`, `+`, or `~`.
    Limiter,
    /// An embedded dynamic value.
    Dynamic,
    /// A selector (or any other text outside a rule body).
    Selector,
}

/// One token of style content.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    RuleBlock(String),
    Comma(String),
    AtRule(String),
    Whitespace(String),
    Limiter(String),
    Dynamic(DynamicValue),
    Selector(String),
}

impl Token {
    /// Returns this token's kind.
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::RuleBlock(_) => TokenKind::RuleBlock,
            Token::Comma(_) => TokenKind::Comma,
            Token::AtRule(_) => TokenKind::AtRule,
            Token::Whitespace(_) => TokenKind::Whitespace,
            Token::Limiter(_) => TokenKind::Limiter,
            Token::Dynamic(_) => TokenKind::Dynamic,
            Token::Selector(_) => TokenKind::Selector,
        }
    }

    /// Returns the token text, or `None` for a dynamic value.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::RuleBlock(text)
            | Token::Comma(text)
            | Token::AtRule(text)
            | Token::Whitespace(text)
            | Token::Limiter(text)
            | Token::Selector(text) => Some(text),
            Token::Dynamic(_) => None,
        }
    }

    /// Returns the dynamic value, if this token carries one.
    pub fn dynamic(&self) -> Option<&DynamicValue> {
        match self {
            Token::Dynamic(value) => Some(value),
            _ => None,
        }
    }
}

/// Facts about the scan that the token list itself does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenDiagnostics {
    /// Rule blocks still open at end of input. Nonzero means the input had
    /// unbalanced braces and the final rule-block token is truncated.
    pub open_rule_blocks: usize,
}

impl TokenDiagnostics {
    /// True when every opened rule block was closed.
    pub fn is_balanced(&self) -> bool {
        self.open_rule_blocks == 0
    }
}

/// The class of the text accumulating in the scan buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    RuleBlock,
    AtRule,
    Whitespace,
    Selector,
}

struct Scanner {
    tokens: Vec<Token>,
    buffer: String,
    pending: Option<Pending>,
    depth: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            buffer: String::new(),
            pending: None,
            depth: 0,
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            self.pending = None;
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        let token = match self.pending.take() {
            Some(Pending::RuleBlock) => Token::RuleBlock(text),
            Some(Pending::AtRule) => Token::AtRule(text),
            Some(Pending::Whitespace) => Token::Whitespace(text),
            Some(Pending::Selector) | None => Token::Selector(text),
        };
        self.tokens.push(token);
    }

    fn open(&mut self, pending: Pending, ch: char) {
        self.pending = Some(pending);
        self.buffer.push(ch);
    }

    fn dynamic(&mut self, value: &DynamicValue) {
        self.flush();
        self.tokens.push(Token::Dynamic(value.clone()));
    }

    fn character(&mut self, ch: char) {
        if self.depth > 0 {
            if self.buffer.is_empty() {
                self.pending = Some(Pending::RuleBlock);
            }
            self.buffer.push(ch);
            if ch == '{' {
                self.depth += 1;
            } else if ch == '}' {
                self.depth -= 1;
                if self.depth == 0 {
                    self.flush();
                }
            }
            return;
        }

        match ch {
            '{' => {
                self.flush();
                self.open(Pending::RuleBlock, ch);
                self.depth = 1;
            }
            ',' => {
                // A comma inside an at-rule prelude is prelude text, not a
                // selector separator.
                if self.pending == Some(Pending::AtRule) {
                    self.buffer.push(ch);
                } else {
                    self.flush();
                    self.tokens.push(Token::Comma(ch.to_string()));
                }
            }
            '>' | '+' | '~' => {
                // Open selectors absorb combinators so attribute values like
                // [href~="x"] stay one token; at-rule preludes absorb them
                // too. Anywhere else they stand alone.
                match self.pending {
                    Some(Pending::Selector) | Some(Pending::AtRule) => self.buffer.push(ch),
                    _ => {
                        self.flush();
                        self.tokens.push(Token::Limiter(ch.to_string()));
                    }
                }
            }
            ' ' | '\n' | '\t' | '\r' => match self.pending {
                Some(Pending::AtRule) | Some(Pending::Whitespace) => self.buffer.push(ch),
                _ => {
                    self.flush();
                    self.open(Pending::Whitespace, ch);
                }
            },
            '@' => {
                self.flush();
                self.open(Pending::AtRule, ch);
            }
            _ => match self.pending {
                None => self.open(Pending::Selector, ch),
                Some(Pending::Selector) | Some(Pending::AtRule) => self.buffer.push(ch),
                _ => {
                    self.flush();
                    self.open(Pending::Selector, ch);
                }
            },
        }
    }

    fn finish(mut self) -> (Vec<Token>, TokenDiagnostics) {
        self.flush();
        let diagnostics = TokenDiagnostics {
            open_rule_blocks: self.depth,
        };
        (self.tokens, diagnostics)
    }
}

/// Tokenizes a style fragment sequence.
///
/// Consecutive characters of the same syntactic class merge into one token;
/// dynamic values always stand alone. Concatenating the tokens' text (with
/// dynamic values restored at their positions) reconstructs the input
/// exactly.
///
/// # Example
///
/// ```rust
/// use insular::{tokenize, StyleFragment, Token};
///
/// let tokens = tokenize(&[StyleFragment::text("div { color: red; }")]);
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Selector("div".to_string()),
///         Token::Whitespace(" ".to_string()),
///         Token::RuleBlock("{ color: red; }".to_string()),
///     ]
/// );
/// ```
pub fn tokenize(styles: &[StyleFragment]) -> Vec<Token> {
    tokenize_with_diagnostics(styles).0
}

/// Tokenizes and reports scan diagnostics alongside the tokens.
///
/// The token list is identical to [`tokenize`]'s; the diagnostics expose the
/// number of rule blocks left open by unbalanced input.
pub fn tokenize_with_diagnostics(styles: &[StyleFragment]) -> (Vec<Token>, TokenDiagnostics) {
    let mut scanner = Scanner::new();
    for fragment in styles {
        match fragment {
            StyleFragment::Text(text) => {
                for ch in text.chars() {
                    scanner.character(ch);
                }
            }
            StyleFragment::Dynamic(value) => scanner.dynamic(value),
        }
    }
    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::StyleFragmentSequence;

    fn text(s: &str) -> StyleFragment {
        StyleFragment::text(s)
    }

    fn selector(s: &str) -> Token {
        Token::Selector(s.to_string())
    }

    fn whitespace(s: &str) -> Token {
        Token::Whitespace(s.to_string())
    }

    fn rule_block(s: &str) -> Token {
        Token::RuleBlock(s.to_string())
    }

    /// Rebuilds the flattened input from a token list.
    fn reassemble(tokens: &[Token]) -> StyleFragmentSequence {
        let mut sections = Vec::new();
        let mut current = String::new();
        for token in tokens {
            match token {
                Token::Dynamic(value) => {
                    sections.push(StyleFragment::Text(std::mem::take(&mut current)));
                    sections.push(StyleFragment::Dynamic(value.clone()));
                }
                other => current.push_str(other.text().unwrap()),
            }
        }
        sections.push(StyleFragment::Text(current));
        sections
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize(&[]).is_empty());
        assert!(tokenize(&[text("")]).is_empty());
    }

    #[test]
    fn test_simple_rule() {
        let tokens = tokenize(&[text("div { color: red; }")]);
        assert_eq!(
            tokens,
            vec![
                selector("div"),
                whitespace(" "),
                rule_block("{ color: red; }"),
            ]
        );
    }

    #[test]
    fn test_comma_separates_selectors() {
        let tokens = tokenize(&[text("h1,h2 {}")]);
        assert_eq!(
            tokens,
            vec![
                selector("h1"),
                Token::Comma(",".to_string()),
                selector("h2"),
                whitespace(" "),
                rule_block("{}"),
            ]
        );
    }

    #[test]
    fn test_standalone_limiter() {
        let tokens = tokenize(&[text("div > p {}")]);
        assert_eq!(
            tokens,
            vec![
                selector("div"),
                whitespace(" "),
                Token::Limiter(">".to_string()),
                whitespace(" "),
                selector("p"),
                whitespace(" "),
                rule_block("{}"),
            ]
        );
    }

    #[test]
    fn test_leading_limiter_stands_alone() {
        let tokens = tokenize(&[text("~p {}")]);
        assert_eq!(
            tokens,
            vec![
                Token::Limiter("~".to_string()),
                selector("p"),
                whitespace(" "),
                rule_block("{}"),
            ]
        );
    }

    #[test]
    fn test_open_selector_absorbs_combinator() {
        // Attribute-value tildes must not split the selector.
        let tokens = tokenize(&[text("a[rel~=\"next\"] {}")]);
        assert_eq!(
            tokens,
            vec![
                selector("a[rel~=\"next\"]"),
                whitespace(" "),
                rule_block("{}"),
            ]
        );
    }

    #[test]
    fn test_at_rule_prelude_absorbs_whitespace_and_commas() {
        let tokens = tokenize(&[text("@media screen, print { p { margin: 0 } }")]);
        assert_eq!(
            tokens,
            vec![
                Token::AtRule("@media screen, print ".to_string()),
                rule_block("{ p { margin: 0 } }"),
            ]
        );
    }

    #[test]
    fn test_nested_braces_stay_one_rule_block() {
        let tokens = tokenize(&[text("@supports (gap: 1rem) { a {} b {} }")]);
        let block = tokens.last().unwrap();
        assert_eq!(block.kind(), TokenKind::RuleBlock);
        assert_eq!(block.text(), Some("{ a {} b {} }"));
    }

    #[test]
    fn test_dynamic_value_splits_rule_block() {
        let styles = vec![
            text("div { background: "),
            StyleFragment::dynamic(|| "blue".to_string()),
            text("; }"),
        ];
        let tokens = tokenize(&styles);

        assert_eq!(
            tokens.iter().map(Token::kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Selector,
                TokenKind::Whitespace,
                TokenKind::RuleBlock,
                TokenKind::Dynamic,
                TokenKind::RuleBlock,
            ]
        );
        assert_eq!(tokens[2].text(), Some("{ background: "));
        assert_eq!(tokens[4].text(), Some("; }"));
    }

    #[test]
    fn test_dynamic_value_keeps_identity() {
        let value = DynamicValue::new(|| "1px".to_string());
        let styles = vec![
            text("p { border: "),
            StyleFragment::Dynamic(value.clone()),
            text(" solid }"),
        ];
        let tokens = tokenize(&styles);
        assert_eq!(tokens[3].dynamic(), Some(&value));
    }

    #[test]
    fn test_unbalanced_braces_reported() {
        let (tokens, diagnostics) = tokenize_with_diagnostics(&[text("div { color: red;")]);
        assert_eq!(diagnostics.open_rule_blocks, 1);
        assert!(!diagnostics.is_balanced());
        // The dangling buffer is still flushed.
        assert_eq!(tokens.last().unwrap().text(), Some("{ color: red;"));

        let (_, diagnostics) = tokenize_with_diagnostics(&[text("div { p {}")]);
        assert_eq!(diagnostics.open_rule_blocks, 1);

        let (_, diagnostics) = tokenize_with_diagnostics(&[text("div {}")]);
        assert!(diagnostics.is_balanced());
    }

    #[test]
    fn test_round_trip_mixed_input() {
        let styles = vec![
            text(".a, .b > .c { margin: "),
            StyleFragment::dynamic(|| "4px".to_string()),
            text("; }\n@media print { * { display: none } }"),
        ];
        let tokens = tokenize(&styles);
        let rebuilt = reassemble(&tokens);

        let flatten = |fragments: &[StyleFragment]| {
            fragments
                .iter()
                .filter_map(StyleFragment::as_text)
                .collect::<String>()
        };
        assert_eq!(flatten(&rebuilt), flatten(&styles));
    }

    proptest::proptest! {
        /// Tokenization never drops or reorders characters.
        #[test]
        fn prop_round_trip_preserves_text(input in "[a-z@{},>+~ .:#\\[\\]\n-]{0,64}") {
            let tokens = tokenize(&[text(&input)]);
            let rebuilt: String = tokens
                .iter()
                .filter_map(Token::text)
                .collect();
            proptest::prop_assert_eq!(rebuilt, input);
        }
    }
}
