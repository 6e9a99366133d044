//! End-to-end tests for `css_calc`

use csscalc::{
    css_calc, CalcCache, CanonicalUnits, Error, Options, Resolver, ResolverConfig, UnitReducer,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn resolver() -> Resolver {
    Resolver::with_cache(Arc::new(CalcCache::new(128)))
}

fn resolve(value: &str) -> String {
    resolver().css_calc(value, &Options::default()).unwrap()
}

fn specified(value: &str) -> String {
    resolver().css_calc(value, &Options::specified_value()).unwrap()
}

#[test]
fn test_folds_same_unit_sums() {
    assert_eq!(resolve("calc(1px + 2px)"), "3px");
    assert_eq!(resolve("calc(10px - 15px)"), "-5px");
}

#[test]
fn test_folds_grouped_products() {
    assert_eq!(resolve("calc((1px + 1px) * 2)"), "4px");
    assert_eq!(resolve("calc(10px / 2)"), "5px");
}

#[test]
fn test_folds_nested_calc() {
    assert_eq!(resolve("calc(calc(1px + 1px) + 1px)"), "3px");
}

#[test]
fn test_mixed_units_stay_symbolic() {
    assert_eq!(resolve("calc(1px + 50%)"), "calc(1px + 50%)");
    assert_eq!(resolve("calc(1em + 2px)"), "calc(1em + 2px)");
}

#[test]
fn test_converts_absolute_lengths() {
    assert_eq!(resolve("calc(1in - 6px)"), "90px");
}

#[test]
fn test_resolves_relative_units_from_options() {
    let options = Options::default().with_unit("em", 16.0);
    assert_eq!(resolver().css_calc("calc(1em + 2px)", &options).unwrap(), "18px");

    let options = Options::default().with_pixel_callback(|value, unit| (unit == "rem").then_some(value * 10.0));
    assert_eq!(resolver().css_calc("calc(2rem * 2)", &options).unwrap(), "40px");
}

#[test]
fn test_values_without_math_pass_through() {
    assert_eq!(resolve("1px solid red"), "1px solid red");
    assert_eq!(resolve("10em"), "10em");
    assert_eq!(resolve(""), "");
}

#[test]
fn test_resolves_math_inside_longer_values() {
    assert_eq!(resolve("1px solid calc(2 * 3px)"), "1px solid 6px");
}

#[test]
fn test_lowercases_and_trims() {
    assert_eq!(resolve("  calc(1PX + 2PX) "), "3px");
}

#[test]
fn test_comparison_functions() {
    assert_eq!(resolve("min(1px, 2px)"), "1px");
    assert_eq!(resolve("max(1px, 2px)"), "2px");
    assert_eq!(resolve("clamp(1px, 5px, 3px)"), "3px");
}

#[test]
fn test_specified_value_keeps_calc() {
    assert_eq!(specified("calc(1px + 2px)"), "calc(3px)");
    assert_eq!(specified("calc(1px + 50%)"), "calc(50% + 1px)");
    assert_eq!(specified("calc(1px + 2em + 3px)"), "calc(2em + 4px)");
}

#[test]
fn test_specified_value_rounds_bare_numbers() {
    assert_eq!(specified("calc(0.1 + 0.2)"), "calc(0.3)");
}

#[test]
fn test_specified_value_is_idempotent() {
    for value in ["calc(2em + 4px)", "calc(3px)", "calc(50% + 1px)", "calc(NaN)"] {
        assert_eq!(specified(value), value, "{value}");
    }
}

#[test]
fn test_unresolved_var_is_empty() {
    assert_eq!(resolve("calc(var(--x) * 2)"), "");
    assert_eq!(specified("calc(var(--x) * 2)"), "calc(var(--x) * 2)");
}

#[test]
fn test_substitutes_vars() {
    let options = Options::default()
        .with_custom_property("--a", "3px")
        .with_custom_property("--gap", "1em 2em");
    let resolver = resolver();
    assert_eq!(resolver.css_calc("calc(var(--a) * 2)", &options).unwrap(), "6px");
    assert_eq!(resolver.css_calc("var(--gap)", &options).unwrap(), "1em 2em");
    assert_eq!(resolver.css_calc("var(--missing, 4px)", &options).unwrap(), "4px");
}

#[test]
fn test_free_function_uses_default_resolver() {
    assert_eq!(css_calc("calc(1px + 2px)", &Options::default()).unwrap(), "3px");
}

struct CountingReducer {
    calls: AtomicUsize,
}

impl UnitReducer for CountingReducer {
    fn reduce(&self, expression: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CanonicalUnits.reduce(expression)
    }
}

#[test]
fn test_repeated_calls_hit_the_cache() {
    let reducer = Arc::new(CountingReducer {
        calls: AtomicUsize::new(0),
    });
    let resolver = resolver().with_reducer(reducer.clone());
    let options = Options::default();

    assert_eq!(resolver.css_calc("calc(1px + 2px)", &options).unwrap(), "3px");
    let calls = reducer.calls.load(Ordering::SeqCst);
    assert!(calls > 0);
    assert_eq!(resolver.cache().len(), 1);

    assert_eq!(resolver.css_calc("calc(1px + 2px)", &options).unwrap(), "3px");
    assert_eq!(reducer.calls.load(Ordering::SeqCst), calls);
}

#[test]
fn test_callbacks_bypass_the_cache() {
    let reducer = Arc::new(CountingReducer {
        calls: AtomicUsize::new(0),
    });
    let resolver = resolver().with_reducer(reducer.clone());
    let options = Options::default().with_pixel_callback(|value, _| Some(value));

    resolver.css_calc("calc(1px + 2px)", &options).unwrap();
    let calls = reducer.calls.load(Ordering::SeqCst);
    resolver.css_calc("calc(1px + 2px)", &options).unwrap();
    assert_eq!(reducer.calls.load(Ordering::SeqCst), calls * 2);
    assert!(resolver.cache().is_empty());
}

#[test]
fn test_cache_capacity_is_configurable() {
    let resolver = Resolver::new(&ResolverConfig { cache_capacity: 1 });
    let options = Options::default();
    resolver.css_calc("calc(1px + 2px)", &options).unwrap();
    resolver.css_calc("calc(2px + 2px)", &options).unwrap();
    assert_eq!(resolver.cache().len(), 1);
}

#[test]
fn test_serializer_errors_propagate() {
    let result = resolver().css_calc("calc(1px + 2em) calc(1px + 1em)", &Options::specified_value());
    assert!(matches!(result, Err(Error::SyntaxError(_))));
}

#[test]
fn test_custom_reducer() {
    let resolver = resolver().with_reducer(Arc::new(|expression: &str| expression.to_string()));
    assert_eq!(
        resolver.css_calc("calc( 1in  + 2px )", &Options::default()).unwrap(),
        "calc(96px + 2px)"
    );
}

#[test]
fn test_specified_value_subtracts_groups() {
    assert_eq!(specified("calc((1px + 1em) - (2px + 1em))"), "calc(0em - 1px)");
}

#[test]
fn test_specified_value_keeps_comparison_functions() {
    assert_eq!(specified("calc(min(1px, 2em) + 1px)"), "calc(1px + min(1px, 2em))");
}

#[test]
fn test_nested_sums_fold_in_one_pass() {
    let once = resolve("calc(1px + (2px + 1em))");
    assert_eq!(once, "calc(3px + 1em)");
    assert_eq!(resolve(&once), once);
}

#[test]
fn test_deep_nesting_is_left_alone() {
    let value = format!("calc({}1px{})", "(".repeat(3000), ")".repeat(3000));
    assert_eq!(resolve(&value), value);
}
