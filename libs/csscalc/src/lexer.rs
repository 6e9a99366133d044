//! CSS value tokenizer
//!
//! Runs the `cssparser` tokenizer and flattens its nested blocks into one token list:
//! a function or `(` token opens a group and an explicit `)` token closes it, so the
//! resolver can walk groups by index. Every token keeps its source text, and the list
//! always ends with an [`TokenKind::Eof`] token.

use crate::token::{Token, TokenKind};
use csscalc_units::split_numeric;
use cssparser::{ParseError, Parser, ParserInput, Token as CssToken};

/// Groups nested deeper than this are kept whole as a single [`TokenKind::Other`] token.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Tokenize a CSS value.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut tokens = Vec::new();
    walk(&mut parser, &mut tokens, 0);
    tokens.push(Token::eof());
    tokens
}

fn walk<'i>(parser: &mut Parser<'i, '_>, out: &mut Vec<Token>, depth: usize) {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return,
        };
        let raw = parser.slice_from(start);
        match token {
            CssToken::Function(_) | CssToken::ParenthesisBlock if depth >= MAX_NESTING_DEPTH => {
                skip_block(parser);
                out.push(Token::new(TokenKind::Other, parser.slice_from(start)));
            }
            CssToken::Function(_) | CssToken::ParenthesisBlock => {
                let kind = if matches!(token, CssToken::Function(_)) {
                    TokenKind::Function
                } else {
                    TokenKind::OpenParen
                };
                out.push(Token::new(kind, raw));
                let inner_start = parser.position();
                // The nested walk never fails; the result only carries cssparser's own
                // end-of-block bookkeeping.
                let _ = parser.parse_nested_block(|nested| {
                    walk(nested, out, depth + 1);
                    Ok::<(), ParseError<'i, ()>>(())
                });
                if parser.slice_from(inner_start).ends_with(')') {
                    out.push(Token::new(TokenKind::CloseParen, ")"));
                }
            }
            CssToken::SquareBracketBlock | CssToken::CurlyBracketBlock => {
                skip_block(parser);
                out.push(Token::new(TokenKind::Other, parser.slice_from(start)));
            }
            CssToken::CloseParenthesis => out.push(Token::new(TokenKind::CloseParen, raw)),
            CssToken::WhiteSpace(_) => out.push(Token::new(TokenKind::Whitespace, raw)),
            CssToken::Comment(_) => out.push(Token::new(TokenKind::Comment, raw)),
            CssToken::Dimension { .. } => match split_numeric(raw) {
                Some((value, unit)) => out.push(Token::dimension(raw, value, unit)),
                None => out.push(Token::new(TokenKind::Other, raw)),
            },
            _ => out.push(Token::new(TokenKind::Other, raw)),
        }
    }
}

/// Consume the block just opened without descending into it.
fn skip_block<'i>(parser: &mut Parser<'i, '_>) {
    let _ = parser.parse_nested_block(|nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok::<(), ParseError<'i, ()>>(())
    });
}
