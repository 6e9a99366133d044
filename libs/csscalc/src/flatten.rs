//! Group reduction
//!
//! A group is a token-value list `[opener, operand, operator, operand, ..., ")"]`.
//! [`sort_calc_values`] folds one group; [`flatten_groups`] reduces nested groups
//! innermost first until only the outermost one is left.

use tracing::trace;

use crate::calculator::{Calculator, Role};
use crate::error::{Error, Result};
use crate::reducer::UnitReducer;
use crate::term::Term;
use crate::util::starts_with_function;

/// Fold one group.
///
/// Multiplicative runs are folded first. With `finalize`, the runs are then summed.
/// Fails when the group is shorter than three values or is not bracketed by an opener
/// and `)`.
pub fn sort_calc_values(values: &[String], finalize: bool, reducer: &dyn UnitReducer) -> Result<String> {
    let (start, operands, end) = match values {
        [start, operands @ .., end] if !operands.is_empty() => (start, operands, end),
        _ => {
            return Err(Error::SyntaxError(format!(
                "Unexpected array length {}.",
                values.len()
            )))
        }
    };
    if !start.ends_with('(') {
        return Err(Error::SyntaxError(format!("Unexpected token {start}.")));
    }
    if end != ")" {
        return Err(Error::SyntaxError(format!("Unexpected token {end}.")));
    }
    if let [operand] = operands {
        return Ok(format!("{start}{operand}{end}"));
    }
    if operands.iter().any(|value| value == ",") {
        let arguments = operands
            .split(|value| value == ",")
            .map(|argument| fold_argument(argument, finalize, reducer))
            .collect::<Result<Vec<_>>>()?;
        return Ok(format!("{start}{}{end}", arguments.join(", ")));
    }

    let mut calculator = Calculator::new(reducer);
    let mut runs: Vec<String> = Vec::new();
    let mut role = Role::Multiply;
    for value in operands {
        match value.as_str() {
            "*" => role = Role::Multiply,
            "/" => role = Role::Divide,
            "+" | "-" => {
                let product = calculator.multiply();
                if !product.is_empty() {
                    runs.push(product);
                    runs.push(value.clone());
                }
                calculator.clear();
                role = Role::Multiply;
            }
            _ => calculator.add_term(Term::classify(value), role),
        }
    }
    let product = calculator.multiply();
    if !product.is_empty() {
        runs.push(product);
    }

    let mut resolved = if finalize && runs.iter().any(|run| run == "+" || run == "-") {
        calculator.clear();
        let mut role = Role::Add;
        for run in &runs {
            match run.as_str() {
                "+" => role = Role::Add,
                "-" => role = Role::Subtract,
                _ => calculator.add_term(Term::classify(run), role),
            }
        }
        calculator.sum()
    } else {
        runs.join(" ")
    };
    resolved = resolved.replace("+ -", "- ");

    if resolved.len() > 1
        && resolved.rfind('(') == Some(0)
        && resolved.find(')') == Some(resolved.len() - 1)
    {
        resolved = resolved[1..resolved.len() - 1].to_string();
    }

    trace!(group = ?values, finalize, %resolved, "Folded calc group");
    Ok(format!("{start}{resolved}{end}"))
}

/// Fold one comma-separated argument of a function group on its own.
///
/// Arguments without an operator (`1px`, `1px solid`) are kept as written.
fn fold_argument(argument: &[String], finalize: bool, reducer: &dyn UnitReducer) -> Result<String> {
    if !argument.iter().any(|value| matches!(value.as_str(), "+" | "-" | "*" | "/")) {
        return Ok(argument.join(" "));
    }
    let mut group = Vec::with_capacity(argument.len() + 2);
    group.push("(".to_string());
    group.extend(argument.iter().cloned());
    group.push(")".to_string());
    let folded = sort_calc_values(&group, finalize, reducer)?;
    Ok(folded[1..folded.len() - 1].to_string())
}

/// Reduce every group after the first, innermost first.
///
/// Each reduced group is spliced back as one value; a result that starts with a
/// function is passed through the reducer once more.
pub fn flatten_groups(mut items: Vec<String>, reducer: &dyn UnitReducer) -> Result<Vec<String>> {
    while let Some(open) = items.iter().rposition(|item| item.ends_with('(')).filter(|&index| index > 0) {
        let close = items[open..]
            .iter()
            .position(|item| item == ")")
            .map(|offset| open + offset)
            .ok_or_else(|| Error::SyntaxError(format!("Unclosed group {}.", items[open])))?;
        let mut reduced = sort_calc_values(&items[open..=close], false, reducer)?;
        if starts_with_function(&reduced) {
            reduced = reducer.reduce(&reduced);
        }
        items.splice(open..=close, std::iter::once(reduced));
    }
    Ok(items)
}
