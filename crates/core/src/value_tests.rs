// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    null          = { Value::Null, false },
    bool_true     = { Value::Bool(true), true },
    bool_false    = { Value::Bool(false), false },
    zero_int      = { Value::Int(0), false },
    nonzero_int   = { Value::Int(3), true },
    zero_float    = { Value::Float(0.0), false },
    empty_string  = { Value::String(String::new()), false },
    false_string  = { Value::String("false".into()), false },
    zero_string   = { Value::String("0".into()), false },
    plain_string  = { Value::String("yes".into()), true },
    empty_seq     = { Value::Seq(vec![]), true },
)]
fn truthiness(value: Value, expected: bool) {
    assert_eq!(value.truthy(), expected);
}

#[test]
fn render_scalars() {
    assert_eq!(Value::Null.render(), "");
    assert_eq!(Value::Bool(true).render(), "true");
    assert_eq!(Value::Int(42).render(), "42");
    assert_eq!(Value::String("hi".into()).render(), "hi");
}

#[test]
fn render_seq_joins_with_newlines() {
    let v = Value::Seq(vec![Value::String("a".into()), Value::String("b".into())]);
    assert_eq!(v.render(), "a\nb");
}

#[test]
fn render_map_flow_style() {
    let v: Value = serde_yaml::from_str("{name: ci, count: 2}").unwrap();
    assert_eq!(v.render(), "{name: ci, count: 2}");
}

#[test]
fn deserialize_yaml_shapes() {
    let v: Value = serde_yaml::from_str("3").unwrap();
    assert_eq!(v, Value::Int(3));
    let v: Value = serde_yaml::from_str("[1, two]").unwrap();
    assert_eq!(v, Value::Seq(vec![Value::Int(1), Value::String("two".into())]));
    let v: Value = serde_yaml::from_str("~").unwrap();
    assert!(v.is_null());
}

#[test]
fn map_key_access() {
    let v: Value = serde_yaml::from_str("{user: {name: ada}}").unwrap();
    let user = v.get("user").unwrap();
    assert_eq!(user.get("name").and_then(Value::as_str), Some("ada"));
    assert!(v.get("missing").is_none());
}

#[test]
fn numeric_view_widens_ints() {
    assert_eq!(Value::Int(2).as_number(), Some(2.0));
    assert_eq!(Value::Float(2.5).as_number(), Some(2.5));
    assert_eq!(Value::String("2".into()).as_number(), None);
}
