//! # csscalc
//!
//! Resolves CSS math functions (`calc()`, `min()`, `max()`, `clamp()`, …) and serializes
//! them canonically.
//!
//! ```
//! use csscalc::{css_calc, Options};
//!
//! assert_eq!(css_calc("calc(1px + 2px)", &Options::default()).unwrap(), "3px");
//! assert_eq!(
//!     css_calc("calc(1px + 2px)", &Options::specified_value()).unwrap(),
//!     "calc(3px)"
//! );
//! ```
//!
//! Resolution runs in three stages: the value is tokenized and its dimensions resolved to
//! pixels where the options allow, the resulting text is reduced by a [`UnitReducer`]
//! (by default the `csscalc-units` evaluator), and in the specified-value format the
//! reduced text is re-serialized with its terms folded and sorted. Results are cached in
//! a bounded LRU cache keyed by value and options.

#![forbid(unsafe_code)]

pub mod cache;
pub mod calculator;
pub mod dimension;
pub mod error;
pub mod flatten;
pub mod lexer;
pub mod options;
pub mod reducer;
pub mod resolver;
pub mod term;
pub mod token;
pub mod util;
pub mod var;

pub use cache::{create_cache_key, CacheItem, CalcCache, DEFAULT_CACHE_CAPACITY};
pub use calculator::{Calculator, Role};
pub use dimension::{resolve_dimension, Resolved};
pub use error::{Error, Result};
pub use flatten::{flatten_groups, sort_calc_values};
pub use lexer::tokenize;
pub use options::{
    CustomPropertyOptions, DimensionOptions, Format, Options, PixelCallback, ResolverConfig,
    VarCallback,
};
pub use reducer::{CanonicalUnits, UnitReducer};
pub use resolver::{css_calc, parse_tokens, serialize_calc, Resolver};
pub use term::Term;
pub use token::{NumericDetail, Token, TokenKind};
pub use var::resolve_var;
