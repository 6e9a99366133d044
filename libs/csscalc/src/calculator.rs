//! Term accumulator
//!
//! Collects the operands of one flattened group into buckets (number, percentage,
//! dimension, opaque) by role, then folds them into a single space-separated expression
//! with [`Calculator::multiply`] or [`Calculator::sum`]. Dimension arithmetic is delegated
//! to the [`UnitReducer`]; opaque terms are kept symbolically.

use csscalc_units::format_number;
use std::fmt;

use crate::reducer::UnitReducer;
use crate::term::{sort_terms, Term};
use crate::util::{has_infix_operator, round_to_precision, PRECISION};

/// How a term enters the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Multiply,
    Divide,
    Add,
    Subtract,
}

/// Running scalar of a product. Once the percentages are folded in it becomes text.
#[derive(Debug, Clone, PartialEq)]
enum Scalar {
    Number(f64),
    Percentage(String),
}

impl Scalar {
    fn finite_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(value) => f.write_str(&format_number(*value)),
            Scalar::Percentage(text) => f.write_str(text),
        }
    }
}

pub struct Calculator<'a> {
    reducer: &'a dyn UnitReducer,
    num_sum: Vec<f64>,
    num_mul: Vec<f64>,
    pct_sum: Vec<f64>,
    pct_mul: Vec<f64>,
    dim_sum: Vec<String>,
    dim_sub: Vec<String>,
    dim_mul: Vec<String>,
    dim_div: Vec<String>,
    etc_sum: Vec<String>,
    etc_sub: Vec<String>,
    etc_mul: Vec<String>,
    etc_div: Vec<String>,
}

impl<'a> Calculator<'a> {
    pub fn new(reducer: &'a dyn UnitReducer) -> Self {
        Self {
            reducer,
            num_sum: Vec::new(),
            num_mul: Vec::new(),
            pct_sum: Vec::new(),
            pct_mul: Vec::new(),
            dim_sum: Vec::new(),
            dim_sub: Vec::new(),
            dim_mul: Vec::new(),
            dim_div: Vec::new(),
            etc_sum: Vec::new(),
            etc_sub: Vec::new(),
            etc_mul: Vec::new(),
            etc_div: Vec::new(),
        }
    }

    pub fn has_num(&self) -> bool {
        !self.num_sum.is_empty() || !self.num_mul.is_empty()
    }

    pub fn has_pct(&self) -> bool {
        !self.pct_sum.is_empty() || !self.pct_mul.is_empty()
    }

    pub fn has_dim(&self) -> bool {
        !self.dim_sum.is_empty()
            || !self.dim_sub.is_empty()
            || !self.dim_mul.is_empty()
            || !self.dim_div.is_empty()
    }

    pub fn has_etc(&self) -> bool {
        !self.etc_sum.is_empty()
            || !self.etc_sub.is_empty()
            || !self.etc_mul.is_empty()
            || !self.etc_div.is_empty()
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for bucket in [&mut self.num_sum, &mut self.num_mul, &mut self.pct_sum, &mut self.pct_mul] {
            bucket.clear();
        }
        for bucket in [
            &mut self.dim_sum,
            &mut self.dim_sub,
            &mut self.dim_mul,
            &mut self.dim_div,
            &mut self.etc_sum,
            &mut self.etc_sub,
            &mut self.etc_mul,
            &mut self.etc_div,
        ] {
            bucket.clear();
        }
    }

    /// Sorted copy of `values`. Every joined bucket goes through here.
    pub fn sort(values: &[String]) -> Vec<String> {
        sort_terms(values)
    }

    /// Record a term.
    ///
    /// Divided numbers enter as their reciprocal and divided percentages as
    /// `10000 / value`, so the product stays a plain multiplication. Subtracted numbers
    /// and percentages are negated.
    pub fn add_term(&mut self, term: Term, role: Role) {
        match (term, role) {
            (Term::Number(value), Role::Multiply) => self.num_mul.push(value),
            (Term::Number(value), Role::Divide) => self.num_mul.push(1.0 / value),
            (Term::Number(value), Role::Add) => self.num_sum.push(value),
            (Term::Number(value), Role::Subtract) => self.num_sum.push(-value),
            (Term::Percentage(value), Role::Multiply) => self.pct_mul.push(value),
            (Term::Percentage(value), Role::Divide) => self.pct_mul.push(10000.0 / value),
            (Term::Percentage(value), Role::Add) => self.pct_sum.push(value),
            (Term::Percentage(value), Role::Subtract) => self.pct_sum.push(-value),
            (Term::Dimension { text, .. }, Role::Multiply) => self.dim_mul.push(text),
            (Term::Dimension { text, .. }, Role::Divide) => self.dim_div.push(text),
            (Term::Dimension { text, .. }, Role::Add) => self.dim_sum.push(text),
            (Term::Dimension { text, .. }, Role::Subtract) => self.dim_sub.push(text),
            (Term::Opaque(text), Role::Multiply) => self.etc_mul.push(text),
            (Term::Opaque(text), Role::Divide) => self.etc_div.push(text),
            (Term::Opaque(text), Role::Add) => self.etc_sum.push(text),
            (Term::Opaque(text), Role::Subtract) => self.etc_sub.push(text),
        }
    }

    fn evaluate(&self, expression: &str) -> String {
        let reduced = self.reducer.reduce(expression);
        match reduced.strip_prefix("calc") {
            Some(rest) => rest.to_string(),
            None => reduced,
        }
    }

    /// Fold the multiplicative buckets.
    pub fn multiply(&self) -> String {
        let mut value: Vec<String> = Vec::new();
        let mut scalar: Option<Scalar> = None;

        if self.has_num() {
            let product = fold_product(1.0, &self.num_mul);
            if !self.has_pct() && !self.has_dim() && !self.has_etc() {
                value.push(format_number(round_finite(product)));
            }
            scalar = Some(Scalar::Number(product));
        }

        if self.has_pct() {
            let start = match scalar {
                Some(Scalar::Number(number)) => number,
                _ => 1.0,
            };
            let product = fold_product(start, &self.pct_mul);
            let pct = if product.is_finite() {
                Scalar::Percentage(format!("{}%", format_number(round_finite(product))))
            } else {
                Scalar::Number(product)
            };
            if !self.has_dim() && !self.has_etc() {
                value.push(pct.to_string());
            }
            scalar = Some(pct);
        }

        if self.has_dim() {
            let mul = join_sorted(&self.dim_mul, " * ");
            let div = join_sorted(&self.dim_div, " * ");
            let div = if div.contains('*') { format!("({div})") } else { div };
            match scalar.as_ref().and_then(Scalar::finite_number) {
                Some(number) => {
                    let number = format_number(number);
                    let expression = match (mul.is_empty(), div.is_empty()) {
                        (false, false) => format!("calc({number} * {mul} / {div})"),
                        (false, true) => format!("calc({number} * {mul})"),
                        (true, _) => format!("calc({number} / {div})"),
                    };
                    value.push(self.evaluate(&expression));
                }
                None => {
                    push_scalar(&mut value, scalar.as_ref());
                    if !mul.is_empty() {
                        let expression = if div.is_empty() {
                            format!("calc({mul})")
                        } else {
                            format!("calc({mul} / {div})")
                        };
                        let dim = self.evaluate(&expression);
                        if !value.is_empty() {
                            value.push("*".to_string());
                        }
                        value.push(dim);
                    } else {
                        let dim = self.evaluate(&format!("calc({div})"));
                        if value.is_empty() {
                            value.push("1".to_string());
                        }
                        value.push("/".to_string());
                        value.push(dim);
                    }
                }
            }
        }

        if self.has_etc() {
            if !self.etc_mul.is_empty() {
                push_scalar(&mut value, scalar.as_ref());
                let mul = join_sorted(&self.etc_mul, " * ");
                if value.is_empty() {
                    value.push(mul);
                } else {
                    value.push(format!("* {mul}"));
                }
            }
            if !self.etc_div.is_empty() {
                push_scalar(&mut value, scalar.as_ref());
                let div = join_sorted(&self.etc_div, " * ");
                let div = if self.etc_div.len() > 1 { format!("({div})") } else { div };
                if value.is_empty() {
                    value.push(format!("1 / {div}"));
                } else {
                    value.push(format!("/ {div}"));
                }
            }
        }

        value.join(" ")
    }

    /// Fold the additive buckets.
    pub fn sum(&self) -> String {
        let mut value: Vec<String> = Vec::new();

        if self.has_num() {
            value.push(format_number(fold_sum(&self.num_sum)));
        }

        if self.has_pct() {
            let total = fold_sum(&self.pct_sum);
            let pct = if total.is_finite() {
                format!("{}%", format_number(total))
            } else {
                format_number(total)
            };
            if value.is_empty() {
                value.push(pct);
            } else {
                value.push(format!("+ {pct}"));
            }
        }

        if !self.dim_sum.is_empty() || !self.dim_sub.is_empty() {
            let sum = join_sorted(&self.dim_sum, " + ");
            let sub = join_sorted(&self.dim_sub, " + ");
            // The subtracted group is negated as a whole.
            let sub = if self.dim_sub.len() > 1 || sub.contains('-') {
                format!("({sub})")
            } else {
                sub
            };
            let expression = if sum.is_empty() {
                if sub.starts_with('(') {
                    format!("calc(-1 * {sub})")
                } else {
                    format!("calc(-1 * ({sub}))")
                }
            } else if sub.is_empty() {
                format!("calc({sum})")
            } else {
                format!("calc({sum} - {sub})")
            };
            let dim = self.evaluate(&expression);
            if !value.is_empty() {
                value.push("+".to_string());
            }
            value.push(dim);
        }

        if self.has_etc() {
            if !self.etc_sum.is_empty() {
                let sum = join_operands(&self.etc_sum);
                if value.is_empty() {
                    value.push(sum);
                } else if self.etc_sum.len() > 1 {
                    value.push(format!("+ ({sum})"));
                } else {
                    value.push(format!("+ {sum}"));
                }
            }
            if !self.etc_sub.is_empty() {
                let sub = join_operands(&self.etc_sub);
                let sub = if self.etc_sub.len() > 1 { format!("({sub})") } else { sub };
                if value.is_empty() {
                    value.push(format!("-1 * {sub}"));
                } else {
                    value.push(format!("- {sub}"));
                }
            }
        }

        value.join(" ")
    }
}

/// Multiply until the product hits zero or stops being finite.
fn fold_product(start: f64, factors: &[f64]) -> f64 {
    let mut product = start;
    for factor in factors {
        product *= factor;
        if product == 0.0 || !product.is_finite() {
            break;
        }
    }
    product
}

/// Add until the total stops being finite.
fn fold_sum(terms: &[f64]) -> f64 {
    let mut total = 0.0;
    for term in terms {
        total += term;
        if !total.is_finite() {
            break;
        }
    }
    total
}

fn round_finite(value: f64) -> f64 {
    if value.is_finite() {
        round_to_precision(value, PRECISION)
    } else {
        value
    }
}

fn push_scalar(value: &mut Vec<String>, scalar: Option<&Scalar>) {
    if value.is_empty() {
        if let Some(scalar) = scalar {
            value.push(scalar.to_string());
        }
    }
}

fn join_sorted(values: &[String], separator: &str) -> String {
    Calculator::sort(values).join(separator)
}

/// Join opaque summands, parenthesizing any that hold a bare infix operator.
fn join_operands(values: &[String]) -> String {
    Calculator::sort(values)
        .into_iter()
        .map(|item| {
            if has_infix_operator(&item) && !item.starts_with('(') && !item.ends_with(')') {
                format!("({item})")
            } else {
                item
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::CanonicalUnits;

    fn calculator() -> Calculator<'static> {
        Calculator::new(&CanonicalUnits)
    }

    fn add(calculator: &mut Calculator<'_>, terms: &[(&str, Role)]) {
        for (text, role) in terms {
            calculator.add_term(Term::classify(text), *role);
        }
    }

    #[test]
    fn multiplies_numbers() {
        let mut calc = calculator();
        add(&mut calc, &[("2", Role::Multiply), ("3", Role::Multiply), ("4", Role::Divide)]);
        assert_eq!(calc.multiply(), "1.5");
    }

    #[test]
    fn rounds_number_products() {
        let mut calc = calculator();
        add(&mut calc, &[("0.1", Role::Multiply), ("3", Role::Multiply)]);
        assert_eq!(calc.multiply(), "0.3");
    }

    #[test]
    fn scales_percentages() {
        let mut calc = calculator();
        add(&mut calc, &[("50%", Role::Multiply), ("2", Role::Multiply)]);
        assert_eq!(calc.multiply(), "100%");
    }

    #[test]
    fn folds_scaled_dimensions() {
        let mut calc = calculator();
        add(&mut calc, &[("10px", Role::Multiply), ("2", Role::Divide)]);
        assert_eq!(calc.multiply(), "5px");
    }

    #[test]
    fn percentage_scalar_stays_symbolic_with_dimensions() {
        let mut calc = calculator();
        add(&mut calc, &[("50%", Role::Multiply), ("2px", Role::Multiply)]);
        assert_eq!(calc.multiply(), "50% * 2px");
    }

    #[test]
    fn divided_dimension_without_scalar() {
        let mut calc = calculator();
        add(&mut calc, &[("2px", Role::Divide)]);
        assert_eq!(calc.multiply(), "1 / 2px");
    }

    #[test]
    fn opaque_factors_keep_the_scalar() {
        let mut calc = calculator();
        add(&mut calc, &[("2", Role::Multiply), ("var(--a)", Role::Multiply)]);
        assert_eq!(calc.multiply(), "2 * var(--a)");

        calc.clear();
        add(&mut calc, &[("2", Role::Multiply), ("var(--a)", Role::Divide), ("var(--b)", Role::Divide)]);
        assert_eq!(calc.multiply(), "2 / (var(--a) * var(--b))");

        calc.clear();
        add(&mut calc, &[("var(--a)", Role::Divide)]);
        assert_eq!(calc.multiply(), "1 / var(--a)");
    }

    #[test]
    fn zero_short_circuits_products() {
        let mut calc = calculator();
        add(&mut calc, &[("0", Role::Multiply), ("1e308", Role::Multiply), ("1e308", Role::Multiply)]);
        assert_eq!(calc.multiply(), "0");
    }

    #[test]
    fn sums_mixed_buckets() {
        let mut calc = calculator();
        add(&mut calc, &[("1", Role::Add), ("2", Role::Subtract)]);
        assert_eq!(calc.sum(), "-1");

        calc.clear();
        add(&mut calc, &[("10%", Role::Add), ("1px", Role::Add), ("2px", Role::Add)]);
        assert_eq!(calc.sum(), "10% + 3px");
    }

    #[test]
    fn subtracts_dimensions() {
        let mut calc = calculator();
        add(&mut calc, &[("5px", Role::Add), ("2px", Role::Subtract)]);
        assert_eq!(calc.sum(), "3px");

        calc.clear();
        add(&mut calc, &[("2px", Role::Subtract)]);
        assert_eq!(calc.sum(), "-2px");
    }

    #[test]
    fn opaque_summands() {
        let mut calc = calculator();
        add(&mut calc, &[("1px", Role::Add), ("var(--a)", Role::Add), ("var(--b)", Role::Subtract)]);
        assert_eq!(calc.sum(), "1px + var(--a) - var(--b)");

        calc.clear();
        add(&mut calc, &[("var(--a)", Role::Subtract)]);
        assert_eq!(calc.sum(), "-1 * var(--a)");
    }

    #[test]
    fn clear_resets_flags() {
        let mut calc = calculator();
        add(&mut calc, &[("1", Role::Add), ("1%", Role::Add), ("1px", Role::Add), ("a", Role::Add)]);
        assert!(calc.has_num() && calc.has_pct() && calc.has_dim() && calc.has_etc());
        calc.clear();
        assert!(!calc.has_num() && !calc.has_pct() && !calc.has_dim() && !calc.has_etc());
        assert_eq!(calc.multiply(), "");
        assert_eq!(calc.sum(), "");
    }

    #[test]
    fn products_stop_at_the_first_non_finite_value() {
        let mut calc = calculator();
        add(&mut calc, &[("1e308", Role::Multiply), ("1e308", Role::Multiply), ("0", Role::Multiply)]);
        assert_eq!(calc.multiply(), "Infinity");

        calc.clear();
        calc.add_term(Term::Number(f64::NAN), Role::Multiply);
        calc.add_term(Term::Number(0.0), Role::Multiply);
        assert_eq!(calc.multiply(), "NaN");
    }

    #[test]
    fn sums_stop_at_the_first_non_finite_value() {
        let mut calc = calculator();
        calc.add_term(Term::Number(f64::INFINITY), Role::Add);
        calc.add_term(Term::Number(f64::INFINITY), Role::Subtract);
        assert_eq!(calc.sum(), "Infinity");
    }

    #[test]
    fn subtracts_several_dimensions_as_a_group() {
        let mut calc = calculator();
        add(&mut calc, &[("10px", Role::Add), ("1em", Role::Subtract), ("2em", Role::Subtract)]);
        assert_eq!(calc.sum(), "(10px - 3em)");

        calc.clear();
        add(&mut calc, &[("10px", Role::Add), ("1px", Role::Subtract), ("2px", Role::Subtract)]);
        assert_eq!(calc.sum(), "7px");
    }

    #[test]
    fn negates_several_dimensions_without_summands() {
        let mut calc = calculator();
        add(&mut calc, &[("1px", Role::Subtract), ("2px", Role::Subtract)]);
        assert_eq!(calc.sum(), "-3px");
    }

    #[test]
    fn subtracts_several_opaque_terms_as_a_group() {
        let mut calc = calculator();
        add(&mut calc, &[("1px", Role::Add), ("var(--a)", Role::Subtract), ("var(--b)", Role::Subtract)]);
        assert_eq!(calc.sum(), "1px - (var(--a) + var(--b))");

        calc.clear();
        add(&mut calc, &[("var(--a)", Role::Subtract), ("var(--b)", Role::Subtract)]);
        assert_eq!(calc.sum(), "-1 * (var(--a) + var(--b))");
    }

    #[test]
    fn sum_ignores_multiplicative_dimensions() {
        let mut calc = calculator();
        add(&mut calc, &[("2px", Role::Multiply)]);
        assert_eq!(calc.sum(), "");
    }
}
