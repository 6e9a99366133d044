//! Token types consumed by the resolver
//!
//! Tokens keep their raw source text so that a token list can be re-emitted verbatim.

/// Token kinds the resolver distinguishes; everything else is [`TokenKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Dimension,
    Function, // name(
    OpenParen,  // (
    CloseParen, // )
    Whitespace,
    Comment,
    Eof,
    Other,
}

/// Decoded numeric part of a dimension token.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericDetail {
    pub value: f64,
    pub unit: String,
}

/// A token of a CSS value
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub detail: Option<NumericDetail>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            detail: None,
        }
    }

    pub fn dimension(value: impl Into<String>, number: f64, unit: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Dimension,
            value: value.into(),
            detail: Some(NumericDetail {
                value: number,
                unit: unit.into(),
            }),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}
