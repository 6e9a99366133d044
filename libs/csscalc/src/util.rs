//! Numeric helpers and the text probes used to route values

use csscalc_units::split_numeric;
use once_cell::sync::Lazy;
use regex::Regex;

/// Significant digits kept when rounding resolved numbers.
pub const PRECISION: usize = 16;

/// CSS math function names.
const MATH_FUNCTIONS: &str = "abs|acos|asin|atan|atan2|calc|clamp|cos|exp|hypot|log|max|min|mod|pow|rem|round|sign|sin|sqrt|tan";

static VAR_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[*/\s(])var\(").expect("valid var() pattern"));

static MATH_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?:^|[*/\s(])(?:{MATH_FUNCTIONS})\(")).expect("valid math pattern")
});

static MATH_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:{MATH_FUNCTIONS})\($")).expect("valid math start pattern")
});

static FUNCTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:var|{MATH_FUNCTIONS})\(")).expect("valid function start pattern")
});

static INFIX_OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s[-+*/]\s").expect("valid operator pattern"));

/// Round to `digits` significant digits. Non-finite values pass through.
pub fn round_to_precision(value: f64, digits: usize) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let digits = digits.max(1);
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Does the value contain a `var(` reference?
pub fn references_var(value: &str) -> bool {
    VAR_REFERENCE.is_match(value)
}

/// Does the value contain a math function call?
pub fn references_math_function(value: &str) -> bool {
    MATH_REFERENCE.is_match(value)
}

/// Is this token text exactly a math function opener such as `calc(`?
pub fn is_math_start(value: &str) -> bool {
    MATH_START.is_match(value)
}

/// Does the value start with `var(` or a math function?
pub fn starts_with_function(value: &str) -> bool {
    FUNCTION_START.is_match(value)
}

/// Does the value hold a space-separated infix operator?
pub fn has_infix_operator(value: &str) -> bool {
    INFIX_OPERATOR.is_match(value)
}

/// `calc(<number>)` → the number.
pub fn calc_number(value: &str) -> Option<f64> {
    let inner = value.strip_prefix("calc(")?.strip_suffix(')')?;
    match split_numeric(inner) {
        Some((number, "")) => Some(number),
        _ => None,
    }
}
