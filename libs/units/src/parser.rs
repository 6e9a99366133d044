//! Math-function parser on top of the `cssparser` tokenizer.
//!
//! Whitespace is insignificant between operands. Precedence (lowest to highest):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := value (('*' | '/') value)*
//! value   := number | percentage | dimension | constant
//!          | '(' sum ')' | calc '(' sum ')' | min/max/clamp/abs/sign '(' sum [, sum]* ')'
//!          | anything else (carried through as opaque text)
//! ```

use crate::ast::{MathFunction, Node, Numeric, Unit};
use crate::error::{Error, Result};
use crate::number::split_numeric;
use crate::serialize::serialize_root;
use crate::simplify::simplify;
use crate::unit::canonicalize;
use crate::ReduceOptions;
use cssparser::{ParseError, Parser, ParserInput, Token};
use std::f64::consts::{E, PI};

type ParseResult<'i, T> = std::result::Result<T, ParseError<'i, ()>>;

const MAX_RECURSION_DEPTH: usize = 64;

/// Reduce every math function in `text`, copying everything else through.
///
/// With `strict` unset a math function that fails to parse is copied verbatim;
/// otherwise the first failure is returned.
pub(crate) fn reduce_value(text: &str, options: &ReduceOptions, strict: bool) -> Result<String> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut out = String::with_capacity(text.len());
    let mut math = MathParser {
        options,
        strict,
        depth: 0,
    };
    math.reduce_components(&mut parser, &mut out)
        .map_err(|err| to_error(&err))?;
    Ok(out)
}

/// Is `name` (without the parenthesis) one of the functions [`reduce_value`] folds?
pub fn is_math_function(name: &str) -> bool {
    name.eq_ignore_ascii_case("calc") || MathFunction::from_name(name).is_some()
}

fn to_error(err: &ParseError<'_, ()>) -> Error {
    Error::Syntax {
        line: err.location.line,
        column: err.location.column,
        message: format!("{:?}", err.kind),
    }
}

struct MathParser<'a> {
    options: &'a ReduceOptions,
    strict: bool,
    depth: usize,
}

impl MathParser<'_> {
    fn reduce_components<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        out: &mut String,
    ) -> ParseResult<'i, ()> {
        loop {
            let start = input.position();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => return Ok(()),
            };
            match token {
                Token::Function(ref name) if is_math_function(name) => {
                    match self.parse_math_function(input, name) {
                        Ok(node) => out.push_str(&serialize_root(&simplify(node))),
                        Err(err) if self.strict => return Err(err),
                        Err(err) => {
                            tracing::debug!("copying unparsable {}(): {:?}", name, err.kind);
                            out.push_str(input.slice_from(start));
                        }
                    }
                }
                Token::Function(_)
                | Token::ParenthesisBlock
                | Token::SquareBracketBlock
                | Token::CurlyBracketBlock => {
                    let close = match token {
                        Token::SquareBracketBlock => ']',
                        Token::CurlyBracketBlock => '}',
                        _ => ')',
                    };
                    if self.depth >= MAX_RECURSION_DEPTH {
                        if self.strict {
                            return Err(input.new_custom_error(()));
                        }
                        // Too deep to walk: keep the whole block as written.
                        input.parse_nested_block(|nested| {
                            while nested.next_including_whitespace_and_comments().is_ok() {}
                            Ok::<(), ParseError<'i, ()>>(())
                        })?;
                        out.push_str(input.slice_from(start));
                        continue;
                    }
                    out.push_str(input.slice_from(start));
                    let inner_start = input.position();
                    self.depth += 1;
                    let result =
                        input.parse_nested_block(|nested| self.reduce_components(nested, out));
                    self.depth -= 1;
                    result?;
                    if input.slice_from(inner_start).ends_with(close) {
                        out.push(close);
                    }
                }
                _ => out.push_str(input.slice_from(start)),
            }
        }
    }

    /// Parse the arguments of a math function whose name token was just consumed.
    fn parse_math_function<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        name: &str,
    ) -> ParseResult<'i, Node> {
        self.depth += 1;
        let result = if self.depth > MAX_RECURSION_DEPTH {
            Err(input.new_custom_error(()))
        } else {
            match MathFunction::from_name(name) {
                Some(function) => {
                    input.parse_nested_block(|nested| self.parse_arguments(nested, function))
                }
                None => input.parse_nested_block(|nested| self.parse_body(nested)),
            }
        };
        self.depth -= 1;
        result
    }

    fn parse_body<'i>(&mut self, input: &mut Parser<'i, '_>) -> ParseResult<'i, Node> {
        let node = self.parse_sum(input)?;
        input.expect_exhausted()?;
        Ok(node)
    }

    fn parse_arguments<'i>(
        &mut self,
        input: &mut Parser<'i, '_>,
        function: MathFunction,
    ) -> ParseResult<'i, Node> {
        let args = input.parse_comma_separated(|arg| self.parse_sum(arg))?;
        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            return Err(input.new_custom_error(()));
        }
        Ok(Node::Function { function, args })
    }

    fn parse_sum<'i>(&mut self, input: &mut Parser<'i, '_>) -> ParseResult<'i, Node> {
        let mut terms = vec![self.parse_product(input)?];
        loop {
            let state = input.state();
            let token = match input.next() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::Delim('+') => terms.push(self.parse_product(input)?),
                Token::Delim('-') => {
                    terms.push(Node::Negate(Box::new(self.parse_product(input)?)));
                }
                _ => {
                    input.reset(&state);
                    break;
                }
            }
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Node::Sum(terms)
        })
    }

    fn parse_product<'i>(&mut self, input: &mut Parser<'i, '_>) -> ParseResult<'i, Node> {
        let mut factors = vec![self.parse_value(input)?];
        loop {
            let state = input.state();
            let token = match input.next() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            match token {
                Token::Delim('*') => factors.push(self.parse_value(input)?),
                Token::Delim('/') => {
                    factors.push(Node::Invert(Box::new(self.parse_value(input)?)));
                }
                _ => {
                    input.reset(&state);
                    break;
                }
            }
        }
        Ok(if factors.len() == 1 {
            factors.remove(0)
        } else {
            Node::Product(factors)
        })
    }

    fn parse_value<'i>(&mut self, input: &mut Parser<'i, '_>) -> ParseResult<'i, Node> {
        input.skip_whitespace();
        let start = input.position();
        let token = input.next()?.clone();
        match token {
            Token::Number { .. } | Token::Percentage { .. } | Token::Dimension { .. } => {
                let raw = input.slice_from(start);
                match self.numeric(raw) {
                    Some(numeric) => Ok(Node::Value(numeric)),
                    None => Err(input.new_unexpected_token_error(token)),
                }
            }
            Token::ParenthesisBlock => {
                self.depth += 1;
                let result = if self.depth > MAX_RECURSION_DEPTH {
                    Err(input.new_custom_error(()))
                } else {
                    input.parse_nested_block(|nested| self.parse_body(nested))
                };
                self.depth -= 1;
                result
            }
            Token::Function(ref name) if is_math_function(name) => {
                self.parse_math_function(input, name)
            }
            Token::Function(_) => {
                input.parse_nested_block(|nested| {
                    while nested.next_including_whitespace_and_comments().is_ok() {}
                    Ok::<(), ParseError<'i, ()>>(())
                })?;
                Ok(Node::Opaque(input.slice_from(start).to_string()))
            }
            Token::Ident(ref name) => Ok(constant(name).map_or_else(
                || Node::Opaque(input.slice_from(start).to_string()),
                |value| Node::Value(Numeric::number(value)),
            )),
            Token::Hash(_)
            | Token::IDHash(_)
            | Token::QuotedString(_)
            | Token::UnquotedUrl(_)
            | Token::AtKeyword(_) => Ok(Node::Opaque(input.slice_from(start).to_string())),
            _ => Err(input.new_unexpected_token_error(token)),
        }
    }

    /// Decode a numeric token from its source text, keeping full `f64` precision.
    fn numeric(&self, raw: &str) -> Option<Numeric> {
        let (value, suffix) = split_numeric(raw)?;
        let numeric = match suffix {
            "" => Numeric::number(value),
            "%" => Numeric {
                value,
                unit: Unit::Percentage,
            },
            unit if self.options.to_canonical_units => {
                let (value, unit) = canonicalize(value, unit);
                Numeric {
                    value,
                    unit: Unit::Dimension(unit),
                }
            }
            unit => Numeric {
                value,
                unit: Unit::Dimension(unit.to_ascii_lowercase()),
            },
        };
        Some(numeric)
    }
}

fn constant(name: &str) -> Option<f64> {
    match name.to_ascii_lowercase().as_str() {
        "e" => Some(E),
        "pi" => Some(PI),
        "infinity" => Some(f64::INFINITY),
        "-infinity" => Some(f64::NEG_INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Node {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let options = ReduceOptions::default();
        let mut math = MathParser {
            options: &options,
            strict: true,
            depth: 0,
        };
        math.parse_body(&mut parser).unwrap()
    }

    fn px(value: f64) -> Node {
        Node::Value(Numeric {
            value,
            unit: Unit::Dimension("px".to_string()),
        })
    }

    #[test]
    fn respects_operator_precedence() {
        assert_eq!(
            parse("1px + 2px * 3"),
            Node::Sum(vec![
                px(1.0),
                Node::Product(vec![px(2.0), Node::Value(Numeric::number(3.0))]),
            ])
        );
    }

    #[test]
    fn subtraction_and_division_wrap_their_operand() {
        assert_eq!(
            parse("4px - 1px / 2"),
            Node::Sum(vec![
                px(4.0),
                Node::Negate(Box::new(Node::Product(vec![
                    px(1.0),
                    Node::Invert(Box::new(Node::Value(Numeric::number(2.0)))),
                ]))),
            ])
        );
    }

    #[test]
    fn canonicalizes_units_while_parsing() {
        assert_eq!(parse("1in"), px(96.0));
    }

    #[test]
    fn unknown_functions_and_identifiers_are_opaque() {
        assert_eq!(
            parse("var(--a, 1px) * foo"),
            Node::Product(vec![
                Node::Opaque("var(--a, 1px)".to_string()),
                Node::Opaque("foo".to_string()),
            ])
        );
    }

    #[test]
    fn parses_constants_case_insensitively() {
        assert_eq!(parse("-Infinity"), Node::Value(Numeric::number(f64::NEG_INFINITY)));
        assert_eq!(parse("pi"), Node::Value(Numeric::number(PI)));
    }

    #[test]
    fn rejects_dangling_operators() {
        let options = ReduceOptions::default();
        assert!(reduce_value("calc(1px +)", &options, true).is_err());
        assert_eq!(
            reduce_value("calc(1px +)", &options, false).unwrap(),
            "calc(1px +)"
        );
    }
}
