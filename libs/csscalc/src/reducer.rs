//! Unit reducer seam
//!
//! The resolver hands every arithmetic sub-expression it builds to a [`UnitReducer`],
//! which reduces a CSS math expression to canonical units. The default reducer is the
//! `csscalc-units` evaluator.

use csscalc_units::ReduceOptions;

pub trait UnitReducer: Send + Sync {
    /// Reduce every math function in `expression`. Text that cannot be reduced comes back
    /// unchanged.
    fn reduce(&self, expression: &str) -> String;
}

/// Reducer backed by `csscalc_units::reduce` with canonical-unit conversion enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalUnits;

impl UnitReducer for CanonicalUnits {
    fn reduce(&self, expression: &str) -> String {
        csscalc_units::reduce(
            expression,
            &ReduceOptions {
                to_canonical_units: true,
            },
        )
    }
}

impl<F> UnitReducer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn reduce(&self, expression: &str) -> String {
        self(expression)
    }
}
