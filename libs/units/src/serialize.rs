use crate::ast::{Node, Numeric, Unit};
use crate::number::format_number;

/// Serialize the result of a whole math function.
///
/// A finite value stands alone (`3px`); anything else stays wrapped so the output is still
/// a valid CSS value (`calc(1px + 50%)`, `calc(infinity * 1px)`, `min(1px, 2em)`).
pub(crate) fn serialize_root(node: &Node) -> String {
    match node {
        Node::Value(numeric) if numeric.value.is_finite() => serialize_value(numeric),
        Node::Function { .. } => serialize(node),
        _ => format!("calc({})", serialize(node)),
    }
}

pub(crate) fn serialize(node: &Node) -> String {
    match node {
        Node::Value(numeric) => serialize_value(numeric),
        Node::Opaque(text) => text.clone(),
        Node::Sum(terms) => {
            let mut out = String::new();
            for (index, term) in terms.iter().enumerate() {
                if index == 0 {
                    out.push_str(&serialize(term));
                    continue;
                }
                match term {
                    Node::Negate(inner) => {
                        out.push_str(" - ");
                        out.push_str(&wrap_sum(inner));
                    }
                    Node::Value(numeric) if numeric.value < 0.0 => {
                        out.push_str(" - ");
                        out.push_str(&serialize_value(&numeric.with_value(-numeric.value)));
                    }
                    _ => {
                        out.push_str(" + ");
                        out.push_str(&serialize(term));
                    }
                }
            }
            out
        }
        Node::Product(factors) => {
            let mut out = String::new();
            for (index, factor) in factors.iter().enumerate() {
                match factor {
                    Node::Invert(inner) => {
                        out.push_str(if index == 0 { "1 / " } else { " / " });
                        out.push_str(&wrap_operand(inner));
                    }
                    _ => {
                        if index > 0 {
                            out.push_str(" * ");
                        }
                        out.push_str(&wrap_sum(factor));
                    }
                }
            }
            out
        }
        Node::Negate(inner) => format!("-1 * {}", wrap_sum(inner)),
        Node::Invert(inner) => format!("1 / {}", wrap_operand(inner)),
        Node::Function { function, args } => {
            let args: Vec<String> = args.iter().map(serialize).collect();
            format!("{}({})", function.name(), args.join(", "))
        }
    }
}

fn serialize_value(numeric: &Numeric) -> String {
    if numeric.value.is_finite() {
        return format!("{}{}", format_number(numeric.value), numeric.unit.suffix());
    }
    let literal = if numeric.value.is_nan() {
        "NaN"
    } else if numeric.value > 0.0 {
        "infinity"
    } else {
        "-infinity"
    };
    match numeric.unit {
        Unit::Number => literal.to_string(),
        _ => format!("{} * 1{}", literal, numeric.unit.suffix()),
    }
}

fn wrap_sum(node: &Node) -> String {
    match node {
        Node::Sum(_) => format!("({})", serialize(node)),
        _ => serialize(node),
    }
}

/// Divisors bind tighter than anything but a single value.
fn wrap_operand(node: &Node) -> String {
    match node {
        Node::Sum(_) | Node::Product(_) | Node::Negate(_) | Node::Invert(_) => {
            format!("({})", serialize(node))
        }
        Node::Value(numeric) if !numeric.value.is_finite() && numeric.unit != Unit::Number => {
            format!("({})", serialize(node))
        }
        _ => serialize(node),
    }
}
