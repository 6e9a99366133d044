//! `var()` substitution
//!
//! Replaces each `var(--name[, fallback])` with the custom property value, looked up in
//! the options' callback, then the options' value map, then the fallback. Substituted
//! values are themselves substituted, up to [`MAX_SUBSTITUTION_DEPTH`] levels.

use tracing::{debug, trace};

use crate::cache::create_cache_key;
use crate::error::Result;
use crate::lexer::tokenize;
use crate::options::Options;
use crate::resolver::Resolver;
use crate::token::{Token, TokenKind};
use crate::util::references_math_function;

const NAMESPACE: &str = "css-var";

pub const MAX_SUBSTITUTION_DEPTH: usize = 32;

/// Resolve every `var()` in `value`.
///
/// Returns `None` when any reference has neither a value nor a fallback. Substituted text
/// holding math functions is resolved through `resolver`.
pub fn resolve_var(resolver: &Resolver, value: &str, options: &Options) -> Result<Option<String>> {
    let cache_key = create_cache_key(NAMESPACE, "resolveVar", value, options);
    if let Some(key) = &cache_key {
        if let Some(item) = resolver.cache().get(key) {
            trace!(%value, "css-var cache hit");
            return Ok(item.into_item());
        }
    }

    let resolved = match substitute(value, options, 0) {
        Some(text) if references_math_function(&text) => Some(resolver.css_calc(&text, options)?),
        other => other,
    }
    .map(|text| text.trim().to_string())
    .filter(|text| !text.is_empty());

    if resolved.is_none() {
        debug!(%value, "Custom property reference left unresolved");
    }
    if let Some(key) = &cache_key {
        resolver.cache().set(key, resolved.clone());
    }
    Ok(resolved)
}

fn substitute(text: &str, options: &Options, depth: usize) -> Option<String> {
    if depth > MAX_SUBSTITUTION_DEPTH {
        debug!(%text, "Custom property substitution too deep");
        return None;
    }
    let tokens = tokenize(text);
    let mut out = String::with_capacity(text.len());
    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        if token.kind == TokenKind::Function && token.value.eq_ignore_ascii_case("var(") {
            let close = matching_close(&tokens, index)?;
            out.push_str(&substitute_reference(&tokens[index + 1..close], options, depth)?);
            index = close + 1;
        } else {
            out.push_str(&token.value);
            index += 1;
        }
    }
    Some(out)
}

fn substitute_reference(arguments: &[Token], options: &Options, depth: usize) -> Option<String> {
    let (name, fallback) = match top_level_comma(arguments) {
        Some(comma) => (&arguments[..comma], Some(&arguments[comma + 1..])),
        None => (arguments, None),
    };
    let name = concat(name);
    let name = name.trim();
    if !name.starts_with("--") {
        return None;
    }
    let value = lookup(name, options).or_else(|| fallback.map(|tokens| concat(tokens).trim().to_string()))?;
    substitute(&value, options, depth + 1)
}

fn lookup(name: &str, options: &Options) -> Option<String> {
    let custom = &options.custom_property;
    custom
        .callback
        .as_ref()
        .and_then(|callback| callback(name))
        .or_else(|| custom.values.get(name).cloned())
}

fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn top_level_comma(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Function | TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => depth = depth.saturating_sub(1),
            TokenKind::Other if depth == 0 && token.value == "," => return Some(index),
            _ => {}
        }
    }
    None
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.value.as_str()).collect()
}
