// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency-aware variable resolution
//!
//! Declared variables may reference each other with `${{ name }}`; values
//! are evaluated in topological order so `y: "${{ x }} world"` sees the
//! resolved `x` regardless of declaration order. Only names that are keys
//! of the same mapping count as dependencies — a reference to anything else
//! is left for the interpolator, which keeps unknown names literal.

use crate::error::EngineError;
use atkins_core::{Scope, Value};
use atkins_expr::Interpolator;
use atkins_pipeline::{load_env_includes, EnvDecl};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

/// Head identifier of each `${{ name }}` / `${{ name.field }}` token.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\{\s*([A-Za-z_][A-Za-z0-9_]*)(?:\.[A-Za-z0-9_]+)*\s*\}\}")
        .expect("constant regex pattern is valid")
});

/// Names a rendered value references that are also keys in `keys`.
fn references(value: &Value, keys: &HashSet<&str>) -> Vec<String> {
    let Value::String(text) = value else {
        return Vec::new();
    };
    VAR_REF
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            keys.contains(name).then(|| name.to_string())
        })
        .collect()
}

/// Order keys so every variable is evaluated after the variables it
/// references. Deterministic: ready keys drain in declaration order.
fn topo_order(vars: &IndexMap<String, Value>) -> Result<Vec<String>, EngineError> {
    let keys: HashSet<&str> = vars.keys().map(String::as_str).collect();
    let mut deps: HashMap<&str, Vec<String>> = HashMap::new();
    for (key, value) in vars {
        deps.insert(key.as_str(), references(value, &keys));
    }

    let mut resolved: Vec<String> = Vec::with_capacity(vars.len());
    let mut done: HashSet<&str> = HashSet::new();

    while resolved.len() < vars.len() {
        let mut progressed = false;
        for key in vars.keys() {
            if done.contains(key.as_str()) {
                continue;
            }
            let ready = deps
                .get(key.as_str())
                .is_none_or(|d| d.iter().all(|dep| done.contains(dep.as_str())));
            if ready {
                done.insert(key.as_str());
                resolved.push(key.clone());
                progressed = true;
            }
        }
        if !progressed {
            // Whatever is left participates in a cycle; name the first for
            // a stable error message.
            let stuck = vars
                .keys()
                .find(|k| !done.contains(k.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(EngineError::VariableCycle(stuck));
        }
    }

    Ok(resolved)
}

/// Evaluate a vars mapping into `scope`, dependency order first.
///
/// String values are rendered through the interpolator (so `$(...)` and
/// `${{...}}` both work); non-string values bind unchanged.
pub async fn merge_variables(
    vars: &IndexMap<String, Value>,
    scope: &mut Scope,
    interp: &Interpolator<'_>,
) -> Result<(), EngineError> {
    for key in topo_order(vars)? {
        let Some(value) = vars.get(&key) else {
            continue;
        };
        match value {
            Value::String(text) => {
                let rendered = interp.interpolate(text, scope).await?;
                scope.bind(key, Value::String(rendered));
            }
            other => scope.bind(key, other.clone()),
        }
    }
    Ok(())
}

/// Apply an `env:` declaration: includes load first, then `vars` interpolate
/// and override key-by-key. Returns the widened scope.
pub async fn apply_env_decl(
    decl: &EnvDecl,
    scope: &Scope,
    interp: &Interpolator<'_>,
    base_dir: &Path,
) -> Result<Scope, EngineError> {
    let mut overlay = if decl.include.is_empty() {
        IndexMap::new()
    } else {
        load_env_includes(&decl.include, base_dir)?
    };

    for (key, value) in &decl.vars {
        let rendered = interp.interpolate(&value.render(), scope).await?;
        overlay.insert(key.clone(), rendered);
    }

    Ok(scope.overlay_env(&overlay))
}

#[cfg(test)]
#[path = "vars_tests.rs"]
mod tests;
