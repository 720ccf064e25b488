// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use atkins_core::{Scope, Value};
use indexmap::IndexMap;

fn scope(pairs: &[(&str, Value)]) -> Scope {
    let vars: IndexMap<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Scope::new().overlay(vars)
}

#[test]
fn identifier_lookup() {
    let s = scope(&[("name", Value::String("ada".into()))]);
    assert_eq!(
        eval_str("name", &s, false).unwrap(),
        Value::String("ada".into())
    );
}

#[test]
fn strict_mode_errors_on_unbound() {
    let s = scope(&[]);
    assert_eq!(
        eval_str("missing", &s, false),
        Err(ExprError::Undefined("missing".to_string()))
    );
}

#[test]
fn allow_undefined_yields_null() {
    let s = scope(&[]);
    assert_eq!(eval_str("missing", &s, true).unwrap(), Value::Null);
}

#[test]
fn dotted_access_on_mapping() {
    let user: Value = serde_yaml::from_str("{name: ada, admin: true}").unwrap();
    let s = scope(&[("user", user)]);
    assert_eq!(
        eval_str("user.name", &s, false).unwrap(),
        Value::String("ada".into())
    );
    assert_eq!(eval_str("user.admin", &s, false).unwrap(), Value::Bool(true));
    // Missing keys on a mapping are null, not an error.
    assert_eq!(eval_str("user.missing", &s, false).unwrap(), Value::Null);
}

#[test]
fn dotted_access_on_scalar_is_strict_error() {
    let s = scope(&[("x", Value::Int(1))]);
    assert!(matches!(
        eval_str("x.field", &s, false),
        Err(ExprError::BadAccess { .. })
    ));
    assert_eq!(eval_str("x.field", &s, true).unwrap(), Value::Null);
}

// `a ?? b` defaults only on nil/missing; empty string, false, and 0 are
// all kept.
#[yare::parameterized(
    missing      = { None, Value::String("default".into()) },
    null         = { Some(Value::Null), Value::String("default".into()) },
    empty_string = { Some(Value::String(String::new())), Value::String(String::new()) },
    false_value  = { Some(Value::Bool(false)), Value::Bool(false) },
    zero         = { Some(Value::Int(0)), Value::Int(0) },
    present      = { Some(Value::String("set".into())), Value::String("set".into()) },
)]
fn coalesce_defaults_only_nil(bound: Option<Value>, expected: Value) {
    let s = match bound {
        Some(v) => scope(&[("a", v)]),
        None => scope(&[]),
    };
    assert_eq!(eval_str("a ?? 'default'", &s, false).unwrap(), expected);
}

#[test]
fn coalesce_right_side_is_lazy() {
    // The right side only evaluates when the left is nil: a bound left
    // keeps an unbound right from erroring in strict mode.
    let s = scope(&[("a", Value::Int(1))]);
    assert_eq!(eval_str("a ?? missing", &s, false).unwrap(), Value::Int(1));
}

#[yare::parameterized(
    int_eq        = { "1 == 1", true },
    int_float_eq  = { "1 == 1.0", true },
    string_eq     = { "'a' == 'a'", true },
    string_ne     = { "'a' != 'b'", true },
    lt            = { "1 < 2", true },
    le_equal      = { "2 <= 2", true },
    gt_false      = { "1 > 2", false },
    string_lt     = { "'abc' < 'abd'", true },
    null_eq_null  = { "null == null", true },
    mixed_types   = { "'1' == 1", false },
)]
fn comparisons(input: &str, expected: bool) {
    let s = scope(&[]);
    assert_eq!(eval_str(input, &s, false).unwrap(), Value::Bool(expected));
}

#[test]
fn ordering_on_incomparable_types_errors() {
    let s = scope(&[]);
    assert!(matches!(
        eval_str("true < 1", &s, false),
        Err(ExprError::BadComparison { .. })
    ));
}

#[yare::parameterized(
    and_true    = { "true && true", true },
    and_false   = { "true && false", false },
    or_true     = { "false || true", true },
    not         = { "!false", true },
    grouped     = { "(true || false) && true", true },
    string_and  = { "'x' && true", true },
)]
fn boolean_logic(input: &str, expected: bool) {
    let s = scope(&[]);
    assert_eq!(eval_str(input, &s, false).unwrap(), Value::Bool(expected));
}

// `if:` truthiness coercion over evaluated values.
#[yare::parameterized(
    unbound       = { "missing", false },
    empty_string  = { "empty", false },
    false_string  = { "falsy", false },
    zero_string   = { "zeroish", false },
    plain_string  = { "word", true },
    zero_int      = { "zero", false },
    nonzero       = { "one", true },
)]
fn condition_coercion(input: &str, expected: bool) {
    let s = scope(&[
        ("empty", Value::String(String::new())),
        ("falsy", Value::String("false".into())),
        ("zeroish", Value::String("0".into())),
        ("word", Value::String("go".into())),
        ("zero", Value::Int(0)),
        ("one", Value::Int(1)),
    ]);
    assert_eq!(eval_condition(input, &s).unwrap(), expected);
}

#[test]
fn condition_with_comparison_against_unbound() {
    let s = scope(&[]);
    // Unbound compares as null: equality with a string is simply false.
    assert!(!eval_condition("missing == 'x'", &s).unwrap());
    assert!(eval_condition("missing == null", &s).unwrap());
}

#[test]
fn array_literal_evaluates_items() {
    let s = scope(&[("x", Value::Int(5))]);
    assert_eq!(
        eval_str("[x, 2]", &s, false).unwrap(),
        Value::Seq(vec![Value::Int(5), Value::Int(2)])
    );
}

#[test]
fn env_entries_resolve_as_strings() {
    let env: IndexMap<String, String> = [("CI".to_string(), "true".to_string())]
        .into_iter()
        .collect();
    let s = Scope::with_env(env);
    assert_eq!(
        eval_str("CI", &s, false).unwrap(),
        Value::String("true".into())
    );
    assert!(eval_condition("CI", &s).unwrap());
}
