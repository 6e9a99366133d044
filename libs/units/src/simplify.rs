//! Constant folding for math-function trees.
//!
//! Values of the same unit are combined, numbers fold into the single non-number factor
//! of a product, equal units cancel across `*` and `/`, and comparison functions resolve
//! once every argument shares a unit. Whatever cannot be folded keeps its shape.

use crate::ast::{MathFunction, Node, Numeric, Unit};

pub(crate) fn simplify(node: Node) -> Node {
    match node {
        Node::Value(_) | Node::Opaque(_) => node,
        Node::Sum(terms) => simplify_sum(terms.into_iter().map(simplify).collect()),
        Node::Product(factors) => simplify_product(
            factors
                .into_iter()
                .map(|factor| match factor {
                    // Divisors stay inverted so the product divides instead of
                    // multiplying by a rounded reciprocal.
                    Node::Invert(inner) => Node::Invert(Box::new(simplify(*inner))),
                    other => simplify(other),
                })
                .collect(),
        ),
        Node::Negate(inner) => negate(simplify(*inner)),
        Node::Invert(inner) => invert(simplify(*inner)),
        Node::Function { function, args } => {
            simplify_function(function, args.into_iter().map(simplify).collect())
        }
    }
}

fn negate(node: Node) -> Node {
    match node {
        Node::Value(numeric) => Node::Value(numeric.with_value(-numeric.value)),
        Node::Negate(inner) => *inner,
        Node::Sum(terms) => simplify_sum(terms.into_iter().map(negate).collect()),
        Node::Product(mut factors) => {
            factors.push(Node::Value(Numeric::number(-1.0)));
            simplify_product(factors)
        }
        other => Node::Negate(Box::new(other)),
    }
}

fn invert(node: Node) -> Node {
    match node {
        Node::Value(Numeric {
            value,
            unit: Unit::Number,
        }) => Node::Value(Numeric::number(1.0 / value)),
        Node::Invert(inner) => *inner,
        Node::Product(factors) => simplify_product(factors.into_iter().map(invert).collect()),
        other => Node::Invert(Box::new(other)),
    }
}

fn simplify_sum(terms: Vec<Node>) -> Node {
    let mut flat = Vec::with_capacity(terms.len());
    collect_terms(terms, &mut flat);
    let mut out: Vec<Node> = Vec::with_capacity(flat.len());
    for term in flat {
        if let Node::Value(numeric) = &term {
            let same_unit = out
                .iter_mut()
                .find(|existing| matches!(existing, Node::Value(e) if e.unit == numeric.unit));
            if let Some(Node::Value(existing)) = same_unit {
                existing.value += numeric.value;
                continue;
            }
        }
        out.push(term);
    }
    if out.len() == 1 {
        out.remove(0)
    } else {
        Node::Sum(out)
    }
}

/// Flatten nested sums so every term goes through the same-unit merge.
fn collect_terms(terms: Vec<Node>, out: &mut Vec<Node>) {
    for term in terms {
        match term {
            Node::Sum(nested) => collect_terms(nested, out),
            term => out.push(term),
        }
    }
}

fn simplify_product(factors: Vec<Node>) -> Node {
    let mut scalar = 1.0;
    let mut numerator: Vec<Numeric> = Vec::new();
    let mut denominator: Vec<Numeric> = Vec::new();
    let mut rest: Vec<Node> = Vec::new();

    let mut flat = Vec::with_capacity(factors.len());
    for factor in factors {
        collect_factors(factor, false, &mut flat);
    }
    for (factor, inverted) in flat {
        match (factor, inverted) {
            (
                Node::Value(Numeric {
                    value,
                    unit: Unit::Number,
                }),
                false,
            ) => scalar *= value,
            (
                Node::Value(Numeric {
                    value,
                    unit: Unit::Number,
                }),
                true,
            ) => scalar /= value,
            (Node::Value(numeric), false) => numerator.push(numeric),
            (Node::Value(numeric), true) => denominator.push(numeric),
            (other, false) => rest.push(other),
            (other, true) => rest.push(Node::Invert(Box::new(other))),
        }
    }

    let mut index = 0;
    while index < denominator.len() {
        let unit = &denominator[index].unit;
        match numerator.iter().position(|numeric| &numeric.unit == unit) {
            Some(pos) => {
                let num = numerator.remove(pos);
                let den = denominator.remove(index);
                scalar *= num.value / den.value;
            }
            None => index += 1,
        }
    }

    if numerator.is_empty() && denominator.is_empty() {
        match rest.as_slice() {
            [] => return Node::Value(Numeric::number(scalar)),
            [Node::Sum(terms)] if terms.iter().all(|term| matches!(term, Node::Value(_))) => {
                let scaled = terms
                    .iter()
                    .filter_map(|term| match term {
                        Node::Value(numeric) => {
                            Some(Node::Value(numeric.with_value(numeric.value * scalar)))
                        }
                        _ => None,
                    })
                    .collect();
                return simplify_sum(scaled);
            }
            _ => {}
        }
    }
    if numerator.len() == 1 && denominator.is_empty() && rest.is_empty() {
        let numeric = numerator.remove(0);
        return Node::Value(numeric.with_value(numeric.value * scalar));
    }

    let mut out = Vec::with_capacity(numerator.len() + denominator.len() + rest.len() + 1);
    match numerator.first_mut() {
        Some(first) => first.value *= scalar,
        None if scalar != 1.0 => out.push(Node::Value(Numeric::number(scalar))),
        None => {}
    }
    out.extend(numerator.into_iter().map(Node::Value));
    out.extend(rest);
    out.extend(
        denominator
            .into_iter()
            .map(|numeric| Node::Invert(Box::new(Node::Value(numeric)))),
    );
    if out.len() == 1 {
        out.remove(0)
    } else {
        Node::Product(out)
    }
}

/// Flatten nested products, tracking whether each factor ends up as a divisor.
fn collect_factors(node: Node, inverted: bool, out: &mut Vec<(Node, bool)>) {
    match node {
        Node::Product(factors) => {
            for factor in factors {
                collect_factors(factor, inverted, out);
            }
        }
        Node::Invert(inner) => collect_factors(*inner, !inverted, out),
        other => out.push((other, inverted)),
    }
}

fn simplify_function(function: MathFunction, args: Vec<Node>) -> Node {
    let values: Option<Vec<&Numeric>> = args
        .iter()
        .map(|arg| match arg {
            Node::Value(numeric) => Some(numeric),
            _ => None,
        })
        .collect();
    let Some(values) = values else {
        return Node::Function { function, args };
    };
    let Some(first) = values.first() else {
        return Node::Function { function, args };
    };
    if values.iter().any(|numeric| numeric.unit != first.unit) {
        return Node::Function { function, args };
    }

    let result = match function {
        MathFunction::Min => values.iter().map(|n| n.value).reduce(css_min),
        MathFunction::Max => values.iter().map(|n| n.value).reduce(css_max),
        MathFunction::Clamp => match values.as_slice() {
            [lo, val, hi] => Some(css_max(lo.value, css_min(val.value, hi.value))),
            _ => None,
        },
        MathFunction::Abs => Some(first.value.abs()),
        MathFunction::Sign => {
            let value = first.value;
            let sign = if value == 0.0 || value.is_nan() {
                value
            } else {
                value.signum()
            };
            return Node::Value(Numeric::number(sign));
        }
    };
    match result {
        Some(value) => Node::Value(first.with_value(value)),
        None => Node::Function { function, args },
    }
}

fn css_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

fn css_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
