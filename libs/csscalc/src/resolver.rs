//! Top-level resolution
//!
//! [`Resolver`] ties the pieces together: the token pass, the unit reducer, the group
//! flattener and the result cache. The free functions [`css_calc`] and [`serialize_calc`]
//! run on a process-wide resolver backed by the global cache.

use csscalc_units::format_number;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

use crate::cache::{self, create_cache_key, CalcCache};
use crate::dimension::{resolve_dimension, Resolved};
use crate::error::Result;
use crate::flatten::{flatten_groups, sort_calc_values};
use crate::lexer::tokenize;
use crate::options::{Options, ResolverConfig};
use crate::reducer::{CanonicalUnits, UnitReducer};
use crate::term::Term;
use crate::token::{Token, TokenKind};
use crate::util::{
    calc_number, has_infix_operator, is_math_start, references_math_function, references_var,
    round_to_precision, starts_with_function, PRECISION,
};
use crate::var::resolve_var;

const NAMESPACE: &str = "css-calc";

static DEFAULT_RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::default);

/// Resolve a CSS value on the process-wide resolver.
pub fn css_calc(value: &str, options: &Options) -> Result<String> {
    DEFAULT_RESOLVER.css_calc(value, options)
}

/// Serialize a specified value on the process-wide resolver.
pub fn serialize_calc(value: &str, options: &Options) -> Result<String> {
    DEFAULT_RESOLVER.serialize_calc(value, options)
}

#[derive(Clone)]
pub struct Resolver {
    cache: Arc<CalcCache>,
    reducer: Arc<dyn UnitReducer>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::with_cache(cache::global())
    }
}

impl Resolver {
    /// Create a resolver with its own cache.
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_cache(Arc::new(CalcCache::new(config.cache_capacity)))
    }

    pub fn with_cache(cache: Arc<CalcCache>) -> Self {
        Self {
            cache,
            reducer: Arc::new(CanonicalUnits),
        }
    }

    /// Replace the unit reducer.
    pub fn with_reducer(mut self, reducer: Arc<dyn UnitReducer>) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn cache(&self) -> &Arc<CalcCache> {
        &self.cache
    }

    pub fn reducer(&self) -> &dyn UnitReducer {
        self.reducer.as_ref()
    }

    /// Resolve the math functions in `value`.
    ///
    /// Values referencing `var()` are substituted first (or returned untouched in the
    /// specified-value format); values without math functions come back unchanged.
    /// `""` means the value resolves to nothing.
    pub fn css_calc(&self, value: &str, options: &Options) -> Result<String> {
        if references_var(value) {
            if options.is_specified_value() {
                return Ok(value.to_string());
            }
            return Ok(resolve_var(self, value, options)?.unwrap_or_default());
        }
        if !references_math_function(value) {
            return Ok(value.to_string());
        }

        let value = value.to_lowercase().trim().to_string();
        let cache_key = create_cache_key(NAMESPACE, "cssCalc", &value, options);
        if let Some(key) = &cache_key {
            if let Some(item) = self.cache.get(key) {
                trace!(%value, "cssCalc cache hit");
                return Ok(item.into_item().unwrap_or_default());
            }
        }

        let values = parse_tokens(tokenize(&value), options)?;
        let mut resolved = self.reducer.reduce(&values.concat());

        if starts_with_function(&value) {
            if let Some(rounded) = round_measure(&resolved) {
                resolved = rounded;
            }
            if options.is_specified_value() && !resolved.is_empty() && !starts_with_function(&resolved) {
                resolved = format!("calc({resolved})");
            }
        }
        if options.is_specified_value() {
            if has_infix_operator(&resolved) && !resolved.contains("NaN") {
                resolved = self.serialize_calc(&resolved, options)?;
            } else if let Some(number) = calc_number(&resolved) {
                resolved = format!("calc({})", format_number(round_to_precision(number, PRECISION)));
            }
        }

        trace!(%value, %resolved, "cssCalc resolved");
        if let Some(key) = &cache_key {
            self.cache.set(key, Some(resolved.clone()).filter(|text| !text.is_empty()));
        }
        Ok(resolved)
    }

    /// Canonically order and fold a specified value such as `calc(1px + 2em + 3px)`.
    pub fn serialize_calc(&self, value: &str, options: &Options) -> Result<String> {
        if !starts_with_function(value) || !options.is_specified_value() {
            return Ok(value.to_string());
        }
        let value = value.to_lowercase().trim().to_string();
        let cache_key = create_cache_key(NAMESPACE, "serializeCalc", &value, options);
        if let Some(key) = &cache_key {
            if let Some(item) = self.cache.get(key) {
                trace!(%value, "serializeCalc cache hit");
                return Ok(item.into_item().unwrap_or_default());
            }
        }

        let items: Vec<String> = tokenize(&value)
            .into_iter()
            .filter(|token| {
                !matches!(
                    token.kind,
                    TokenKind::Whitespace | TokenKind::Comment | TokenKind::Eof
                )
            })
            .map(|token| token.value)
            .filter(|text| !text.is_empty())
            .collect();
        let items = flatten_groups(items, self.reducer())?;
        let serialized = sort_calc_values(&items, true, self.reducer())?;

        if let Some(key) = &cache_key {
            self.cache.set(key, Some(serialized.clone()).filter(|text| !text.is_empty()));
        }
        Ok(serialized)
    }
}

/// Turn a token list into the text fragments handed to the reducer.
///
/// Dimensions resolve to pixels where possible (in the specified-value format only
/// inside math functions). Whitespace collapses to one space and never follows an
/// opener or precedes a `)`.
pub fn parse_tokens(tokens: Vec<Token>, options: &Options) -> Result<Vec<String>> {
    let mut math_depths: HashSet<usize> = HashSet::new();
    let mut depth = 0usize;
    let mut out: Vec<String> = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::Dimension => {
                if options.is_specified_value() && !math_depths.contains(&depth) {
                    out.push(token.value);
                } else {
                    match resolve_dimension(&token, &options.dimension)? {
                        Resolved::Pixels(pixels) => out.push(pixels),
                        Resolved::Unresolved => out.push(token.value),
                    }
                }
            }
            TokenKind::Function | TokenKind::OpenParen => {
                depth += 1;
                if is_math_start(&token.value) {
                    math_depths.insert(depth);
                }
                out.push(token.value);
            }
            TokenKind::CloseParen => {
                if out.last().is_some_and(|last| last == " ") {
                    out.pop();
                }
                out.push(token.value);
                math_depths.remove(&depth);
                depth = depth.saturating_sub(1);
            }
            TokenKind::Whitespace => {
                if out.last().is_some_and(|last| !last.ends_with('(') && last != " ") {
                    out.push(" ".to_string());
                }
            }
            TokenKind::Comment | TokenKind::Eof => {}
            TokenKind::Other => out.push(token.value),
        }
    }
    Ok(out)
}

/// Round a lone length, angle or percentage to [`PRECISION`] digits.
fn round_measure(value: &str) -> Option<String> {
    let (number, unit) = match Term::classify(value) {
        Term::Dimension { value, unit, .. } => (value, unit),
        Term::Percentage(value) => (value, "%".to_string()),
        _ => return None,
    };
    Some(format!("{}{}", format_number(round_to_precision(number, PRECISION)), unit))
}
