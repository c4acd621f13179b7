//! Canonical text rendering of token fragments.
//!
//! The rendered form depends only on the token sequence, never on the
//! original layout, so reformatting or re-commenting a declaration cannot
//! change it. Two word tokens are always separated, which keeps distinct
//! token sequences distinct after rendering.

use thiserror::Error;

use crate::types::{Fragment, Token, TokenKind};

/// Failure to render one declaration. Never fatal for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A required part of the declaration had no tokens.
    #[error("empty {part}")]
    Empty {
        /// Which part was empty (for example "parameter list").
        part: &'static str,
    },

    /// The fragment contains a syntax error node.
    #[error("malformed syntax near `{text}`")]
    Malformed {
        /// Text of the offending node.
        text: String,
    },
}

/// Tokens never followed by a space.
const TIGHT_AFTER: &[&str] = &["(", "[", "*", ".", "...", "~", "&", "!"];

/// Tokens never preceded by a space.
const TIGHT_BEFORE: &[&str] = &[")", "]", ",", ";", ".", "*"];

fn is_name(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Word | TokenKind::Literal)
}

fn needs_space(before_prev: Option<&Token>, prev: &Token, next: &Token) -> bool {
    let p = prev.text.as_str();
    let n = next.text.as_str();

    // `chan<- T` vs `<-chan T`
    if p == "<-" {
        return before_prev.map(|t| t.text == "chan").unwrap_or(false);
    }
    if n == "<-" && p == "chan" {
        return false;
    }

    if TIGHT_AFTER.contains(&p) {
        return false;
    }
    if next.spaced {
        return true;
    }
    if TIGHT_BEFORE.contains(&n) {
        return false;
    }
    if p == "]" {
        return is_name(next) && next.spaced;
    }
    if (n == "(" || n == "[") && (is_name(prev) || p == ")") {
        return false;
    }
    if p == "{" && n == "}" {
        return false;
    }
    true
}

/// Whether a separator token is redundant at this position.
///
/// `next` is the following token that is not a terminator. Terminators
/// right after an opening delimiter or another terminator, and terminators
/// or commas right before a closing delimiter, carry no meaning.
fn is_redundant(prev: Option<&Token>, token: &Token, next: Option<&Token>) -> bool {
    let closes_next = next
        .map(|t| matches!(t.text.as_str(), ")" | "]" | "}"))
        .unwrap_or(true);
    match token.text.as_str() {
        ";" => {
            let opens_prev = prev
                .map(|t| matches!(t.text.as_str(), "{" | "(" | ";"))
                .unwrap_or(true);
            closes_next || opens_prev
        }
        "," => closes_next,
        _ => false,
    }
}

/// Render a fragment in canonical form.
pub fn render(fragment: &Fragment, part: &'static str) -> Result<String, RenderError> {
    if fragment.is_empty() {
        return Err(RenderError::Empty { part });
    }

    let tokens = &fragment.tokens;
    let mut kept: Vec<&Token> = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Invalid {
            return Err(RenderError::Malformed {
                text: token.text.clone(),
            });
        }
        let next = tokens[i + 1..].iter().find(|t| t.text != ";");
        if is_redundant(kept.last().copied(), token, next) {
            continue;
        }
        kept.push(token);
    }

    if kept.is_empty() {
        return Err(RenderError::Empty { part });
    }

    let mut out = String::new();
    for (i, token) in kept.iter().enumerate() {
        if i > 0 {
            let before_prev = if i > 1 { Some(kept[i - 2]) } else { None };
            if needs_space(before_prev, kept[i - 1], token) {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
    }

    Ok(out)
}
