#![forbid(unsafe_code)]

//! Canonical-unit evaluator for CSS math functions.
//!
//! [`reduce`] walks a CSS value, folds every math function it can (`calc()`, `min()`,
//! `max()`, `clamp()`, `abs()`, `sign()`) and re-serializes the rest untouched:
//!
//! ```text
//! calc(1in + 4px)          -> 100px
//! calc(1px + 50%)          -> calc(1px + 50%)
//! min(10px, 2em)           -> min(10px, 2em)
//! rgb(calc(255 / 5) 0 0)   -> rgb(51 0 0)
//! ```

mod ast;
mod error;
mod number;
mod parser;
mod serialize;
mod simplify;
mod unit;

pub use ast::{MathFunction, Node, Numeric, Unit};
pub use error::{Error, Result};
pub use number::{format_number, split_numeric};
pub use parser::is_math_function;
pub use unit::{
    absolute_length_to_px, canonical_unit, canonicalize, convert, is_angle_unit, is_length_unit,
    unit_kind, UnitKind,
};

/// Options accepted by [`reduce`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReduceOptions {
    /// Convert every known unit to the canonical unit of its kind (`px`, `deg`, `s`, `hz`, `dppx`)
    /// before folding.
    pub to_canonical_units: bool,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            to_canonical_units: true,
        }
    }
}

/// Reduce every math function in `text`.
///
/// Never fails: a math function that cannot be parsed is copied through verbatim, and
/// so is the whole input if the value as a whole cannot be walked.
pub fn reduce(text: &str, options: &ReduceOptions) -> String {
    match parser::reduce_value(text, options, false) {
        Ok(reduced) => reduced,
        Err(err) => {
            tracing::debug!("leaving '{}' unreduced: {}", text, err);
            text.to_string()
        }
    }
}

/// Like [`reduce`], but reports a math function that fails to parse.
pub fn try_reduce(text: &str, options: &ReduceOptions) -> Result<String> {
    parser::reduce_value(text, options, true)
}
