//! Term classification and ordering
//!
//! A term is one operand of a flattened calc() group: a bare number, a percentage, a
//! length or angle dimension, or anything else (an opaque term). Opaque terms are never
//! folded numerically.

use csscalc_units::{is_angle_unit, is_length_unit, split_numeric};
use std::cmp::Ordering;

/// A classified operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Number(f64),
    Percentage(f64),
    Dimension { text: String, value: f64, unit: String },
    Opaque(String),
}

impl Term {
    pub fn classify(text: &str) -> Term {
        match split_numeric(text) {
            Some((value, "")) if value.is_finite() => Term::Number(value),
            Some((value, "%")) => Term::Percentage(value),
            Some((value, unit)) if is_length_unit(unit) || is_angle_unit(unit) => Term::Dimension {
                text: text.to_string(),
                value,
                unit: unit.to_string(),
            },
            _ => Term::Opaque(text.to_string()),
        }
    }
}

enum SortKey<'a> {
    Measured { value: f64, unit: &'a str },
    Text(&'a str),
}

fn sort_key(text: &str) -> SortKey<'_> {
    match split_numeric(text) {
        Some((value, unit))
            if unit == "%" || is_length_unit(unit) || is_angle_unit(unit) =>
        {
            SortKey::Measured { value, unit }
        }
        _ => SortKey::Text(text),
    }
}

/// Order two term texts.
///
/// Measured terms order before the rest; among them the unit name decides, then the
/// numeric value. Anything else compares as text.
pub fn compare_terms(a: &str, b: &str) -> Ordering {
    match (sort_key(a), sort_key(b)) {
        (
            SortKey::Measured { value: va, unit: ua },
            SortKey::Measured { value: vb, unit: ub },
        ) => ua.cmp(ub).then_with(|| va.total_cmp(&vb)),
        (SortKey::Measured { .. }, SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Measured { .. }) => Ordering::Greater,
        (SortKey::Text(ta), SortKey::Text(tb)) => ta.cmp(tb),
    }
}

/// Sorted copy of `values`. The input is left untouched.
pub fn sort_terms(values: &[String]) -> Vec<String> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| compare_terms(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn classifies_terms() {
        assert_eq!(Term::classify("2"), Term::Number(2.0));
        assert_eq!(Term::classify("-1.5e2"), Term::Number(-150.0));
        assert_eq!(Term::classify("50%"), Term::Percentage(50.0));
        assert!(matches!(Term::classify("1px"), Term::Dimension { value, .. } if value == 1.0));
        assert!(matches!(Term::classify("90deg"), Term::Dimension { .. }));
        assert_eq!(Term::classify("2s"), Term::Opaque("2s".to_string()));
        assert_eq!(Term::classify("var(--a)"), Term::Opaque("var(--a)".to_string()));
        assert_eq!(Term::classify("1e400"), Term::Opaque("1e400".to_string()));
        assert_eq!(Term::classify("(1px + 1em)"), Term::Opaque("(1px + 1em)".to_string()));
    }

    #[test]
    fn sorts_by_unit_then_value() {
        let values = strings(&["3px", "1em", "2px", "10%"]);
        assert_eq!(sort_terms(&values), strings(&["10%", "1em", "2px", "3px"]));
        assert_eq!(values[0], "3px");
    }

    #[test]
    fn measured_terms_sort_first() {
        let values = strings(&["var(--b)", "1px", "var(--a)"]);
        assert_eq!(sort_terms(&values), strings(&["1px", "var(--a)", "var(--b)"]));
    }
}
