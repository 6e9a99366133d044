//! Dimension-to-pixel resolution

use csscalc_units::{absolute_length_to_px, format_number};
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::DimensionOptions;
use crate::token::{Token, TokenKind};
use crate::util::{round_to_precision, PRECISION};

/// Outcome of resolving a dimension token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// `<n>px`
    Pixels(String),
    Unresolved,
}

/// Resolve a dimension token to pixels.
///
/// `px` passes through. Absolute lengths convert directly; other units go through the
/// pixel callback, then the per-unit factors. Anything that does not produce a finite
/// pixel value is [`Resolved::Unresolved`].
pub fn resolve_dimension(token: &Token, dimension: &DimensionOptions) -> Result<Resolved> {
    let detail = match (&token.kind, &token.detail) {
        (TokenKind::Dimension, Some(detail)) => detail,
        _ => {
            return Err(Error::TypeError(format!(
                "Expected a dimension token but got {:?} {:?}.",
                token.kind, token.value
            )))
        }
    };
    if detail.unit.eq_ignore_ascii_case("px") {
        return Ok(Resolved::Pixels(format!("{}px", format_number(detail.value))));
    }
    match to_pixels(detail.value, &detail.unit, dimension) {
        Some(pixels) if pixels.is_finite() => Ok(Resolved::Pixels(format!(
            "{}px",
            format_number(round_to_precision(pixels, PRECISION))
        ))),
        _ => {
            debug!(token = %token.value, "Dimension left unresolved");
            Ok(Resolved::Unresolved)
        }
    }
}

/// Convert `value` in `unit` to pixels.
pub fn to_pixels(value: f64, unit: &str, dimension: &DimensionOptions) -> Option<f64> {
    let unit = unit.to_ascii_lowercase();
    if let Some(pixels) = absolute_length_to_px(value, &unit) {
        return Some(pixels);
    }
    if let Some(pixels) = dimension.callback.as_ref().and_then(|callback| callback(value, &unit)) {
        return Some(pixels);
    }
    dimension.units.get(&unit).map(|factor| value * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn pixels_pass_through() {
        let token = Token::dimension("1.50px", 1.5, "px");
        assert_eq!(
            resolve_dimension(&token, &DimensionOptions::default()),
            Ok(Resolved::Pixels("1.5px".to_string()))
        );
    }

    #[test]
    fn converts_absolute_lengths() {
        let token = Token::dimension("1in", 1.0, "in");
        assert_eq!(
            resolve_dimension(&token, &DimensionOptions::default()),
            Ok(Resolved::Pixels("96px".to_string()))
        );
    }

    #[test]
    fn uses_unit_factors_and_callback() {
        let mut dimension = DimensionOptions::default();
        dimension.units.insert("em".to_string(), 16.0);
        let token = Token::dimension("2em", 2.0, "em");
        assert_eq!(
            resolve_dimension(&token, &dimension),
            Ok(Resolved::Pixels("32px".to_string()))
        );

        dimension.callback = Some(Arc::new(|value: f64, unit: &str| (unit == "em").then_some(value * 10.0)));
        assert_eq!(
            resolve_dimension(&token, &dimension),
            Ok(Resolved::Pixels("20px".to_string()))
        );
    }

    #[test]
    fn unknown_units_stay_unresolved() {
        let token = Token::dimension("2vw", 2.0, "vw");
        assert_eq!(
            resolve_dimension(&token, &DimensionOptions::default()),
            Ok(Resolved::Unresolved)
        );

        let mut dimension = DimensionOptions::default();
        dimension.callback = Some(Arc::new(|_: f64, _: &str| Some(f64::NAN)));
        assert_eq!(resolve_dimension(&token, &dimension), Ok(Resolved::Unresolved));
    }

    #[test]
    fn rejects_other_tokens() {
        let token = Token::new(TokenKind::Other, "+");
        assert!(matches!(
            resolve_dimension(&token, &DimensionOptions::default()),
            Err(Error::TypeError(_))
        ));
    }
}
