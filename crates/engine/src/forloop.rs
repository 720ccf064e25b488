// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `for:` loop expansion
//!
//! A loop header binds one or two names over a source expression:
//!
//!   - `item in ${{ list }}`
//!   - `(i, item) in ["a", "b"]`
//!   - `(key, value) in ${{ mapping }}` — pairs when the source is a
//!     single mapping, index/item otherwise
//!
//! Source resolution order: `$(shell)` stdout split on newlines, `${{...}}`
//! expression, bare expression (array literals included), bare identifier.

use crate::error::EngineError;
use atkins_core::{Scope, Value};
use atkins_expr::{eval_str, Interpolator};
use atkins_shell::ShellRunner;
use indexmap::IndexMap;

/// One expansion of a loop body: the overlay to run it under and the label
/// for its tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopIteration {
    pub label: String,
    pub vars: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopHeader {
    pub keys: LoopKeys,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopKeys {
    /// `var in ...`
    One(String),
    /// `(a, b) in ...` — index/item, or key/value over a mapping.
    Two(String, String),
}

fn loop_error(header: &str, message: impl Into<String>) -> EngineError {
    EngineError::Loop {
        header: header.to_string(),
        message: message.into(),
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphanumeric() && (i > 0 || !c.is_ascii_digit()))
}

/// Parse a loop header into its bound names and source expression.
pub fn parse_loop(header: &str) -> Result<LoopHeader, EngineError> {
    let text = header.trim();

    let (keys, rest) = if let Some(after) = text.strip_prefix('(') {
        let Some((names, rest)) = after.split_once(')') else {
            return Err(loop_error(header, "missing ')' after loop names"));
        };
        let parts: Vec<&str> = names.split(',').map(str::trim).collect();
        let [first, second] = parts.as_slice() else {
            return Err(loop_error(header, "expected two names inside parentheses"));
        };
        if !valid_name(first) || !valid_name(second) {
            return Err(loop_error(header, "loop names must be identifiers"));
        }
        (LoopKeys::Two(first.to_string(), second.to_string()), rest)
    } else {
        let Some((name, rest)) = text.split_once(char::is_whitespace) else {
            return Err(loop_error(header, "expected '<name> in <source>'"));
        };
        if !valid_name(name) {
            return Err(loop_error(header, "loop name must be an identifier"));
        }
        (LoopKeys::One(name.to_string()), rest)
    };

    let rest = rest.trim_start();
    let Some(source) = rest.strip_prefix("in").map(str::trim_start) else {
        return Err(loop_error(header, "expected 'in' before the loop source"));
    };
    if source.is_empty() {
        return Err(loop_error(header, "empty loop source"));
    }

    Ok(LoopHeader {
        keys,
        source: source.to_string(),
    })
}

/// Resolve a loop source to a value, trying shell, expression wrapper, bare
/// expression, then bare identifier.
async fn resolve_source(
    header: &str,
    source: &str,
    scope: &Scope,
    shell: &dyn ShellRunner,
) -> Result<Value, EngineError> {
    if let Some(body) = source
        .strip_prefix("$(")
        .and_then(|s| s.strip_suffix(')'))
    {
        let interp = Interpolator::new(shell);
        let command = interp.interpolate(body, scope).await?;
        let output = shell.run(&command, scope.env(), false).await?;
        if output.exit_code != 0 {
            return Err(loop_error(
                header,
                format!("loop source command exited {}", output.exit_code),
            ));
        }
        let items: Vec<Value> = output
            .stdout
            .trim()
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Value::String(l.to_string()))
            .collect();
        return Ok(Value::Seq(items));
    }

    if let Some(body) = source
        .strip_prefix("${{")
        .and_then(|s| s.strip_suffix("}}"))
    {
        return eval_str(body.trim(), scope, true)
            .map_err(|e| loop_error(header, e.to_string()));
    }

    if let Ok(value) = eval_str(source, scope, false) {
        return Ok(value);
    }

    match scope.get(source) {
        Some(value) => Ok(value),
        None => Err(loop_error(
            header,
            format!("loop source '{}' is not defined", source),
        )),
    }
}

/// Coerce a resolved source value to the item sequence.
fn coerce_items(value: Value) -> Vec<Value> {
    match value {
        Value::Seq(items) => items,
        Value::String(text) => {
            let items: Vec<Value> = text
                .split('\n')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| Value::String(l.to_string()))
                .collect();
            if items.is_empty() {
                // Preserve the original string rather than dropping it.
                vec![Value::String(text)]
            } else {
                items
            }
        }
        Value::Map(_) => vec![value],
        other => vec![other],
    }
}

/// Expand a loop header into its iteration overlays.
pub async fn expand_loop(
    header: &str,
    scope: &Scope,
    shell: &dyn ShellRunner,
) -> Result<Vec<LoopIteration>, EngineError> {
    let parsed = parse_loop(header)?;
    let value = resolve_source(header, &parsed.source, scope, shell).await?;
    let items = coerce_items(value);

    let mut iterations = Vec::with_capacity(items.len());
    match &parsed.keys {
        LoopKeys::One(name) => {
            for item in items {
                let label = item.render();
                let vars: IndexMap<String, Value> =
                    [(name.clone(), item)].into_iter().collect();
                iterations.push(LoopIteration { label, vars });
            }
        }
        LoopKeys::Two(first, second) => {
            // A single mapping iterates its pairs; anything else binds
            // index and item.
            if let [Value::Map(map)] = items.as_slice() {
                for (key, value) in map {
                    let vars: IndexMap<String, Value> = [
                        (first.clone(), Value::String(key.clone())),
                        (second.clone(), value.clone()),
                    ]
                    .into_iter()
                    .collect();
                    iterations.push(LoopIteration {
                        label: key.clone(),
                        vars,
                    });
                }
            } else {
                for (index, item) in items.into_iter().enumerate() {
                    let label = item.render();
                    let vars: IndexMap<String, Value> = [
                        (first.clone(), Value::Int(index as i64)),
                        (second.clone(), item),
                    ]
                    .into_iter()
                    .collect();
                    iterations.push(LoopIteration { label, vars });
                }
            }
        }
    }

    Ok(iterations)
}

#[cfg(test)]
#[path = "forloop_tests.rs"]
mod tests;
