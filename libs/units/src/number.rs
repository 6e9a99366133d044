//! Number scanning and formatting shared by the evaluator and its callers.

/// Split a CSS numeric literal into its value and trailing unit text.
///
/// Accepts `[+-]? (digits [. digits] | . digits) [e [+-] digits]` followed by any unit,
/// so `"1.5px"` gives `(1.5, "px")`, `"50%"` gives `(50.0, "%")` and `"3"` gives `(3.0, "")`.
/// An `e` only starts an exponent when a digit follows it, which keeps `"1em"` a dimension.
pub fn split_numeric(text: &str) -> Option<(f64, &str)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;
    if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            pos = exp;
        }
    }
    let value = text[..pos].parse::<f64>().ok()?;
    Some((value, &text[pos..]))
}

/// Format a number the way it is written back into CSS text.
///
/// Finite values use the shortest round-tripping representation (`-0` prints as `0`).
/// Non-finite values print as the literals `Infinity`, `-Infinity` and `NaN`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
