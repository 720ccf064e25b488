// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scalar/sequence/mapping value type shared by documents and expressions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A YAML-shaped value: scalar, sequence, or mapping.
///
/// Pipeline variables, expression results, and `with:` arguments all flow
/// through this type. Mapping keys preserve document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key on a mapping value. Non-mappings have no keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    /// Scalar display form used when weaving a value into a command string.
    ///
    /// Sequences join their rendered items with `\n` so a sequence value
    /// round-trips through the for-loop string coercion. Mappings render in
    /// YAML flow style.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Seq(items) => items
                .iter()
                .map(Value::render)
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Map(map) => {
                let inner = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.render()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{}}}", inner)
            }
        }
    }

    /// Boolean coercion for `if:` conditions.
    ///
    /// Null is false; strings are true unless empty, `"false"`, or `"0"`;
    /// numbers are true when non-zero; sequences and mappings are true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty() && s != "false" && s != "0",
            Value::Seq(_) | Value::Map(_) => true,
        }
    }

    /// Numeric view for comparison operators. Ints widen to f64.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
