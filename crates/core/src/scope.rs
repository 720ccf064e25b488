// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Layered variable scope with copy-on-overlay semantics

use crate::value::Value;
use indexmap::IndexMap;

/// Variable visibility stack: pipeline vars ⊂ job vars ⊂ iteration vars ⊂
/// step-local env overlay.
///
/// Overlaying clones the scope, so concurrent step branches never observe
/// each other's bindings. Identifier lookup merges variables first, then the
/// string environment.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    layers: Vec<IndexMap<String, Value>>,
    env: IndexMap<String, String>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope seeded with a process environment snapshot.
    pub fn with_env(env: IndexMap<String, String>) -> Self {
        Self {
            layers: Vec::new(),
            env,
        }
    }

    /// Returns a new scope with `vars` pushed as the innermost layer.
    pub fn overlay(&self, vars: IndexMap<String, Value>) -> Scope {
        let mut next = self.clone();
        next.layers.push(vars);
        next
    }

    /// Returns a new scope with `vars` merged into the string environment.
    ///
    /// Overlay keys shadow existing environment entries for both expression
    /// lookup and the shell-out environment.
    pub fn overlay_env(&self, vars: &IndexMap<String, String>) -> Scope {
        let mut next = self.clone();
        for (k, v) in vars {
            next.env.insert(k.clone(), v.clone());
        }
        next
    }

    /// Bind a variable into the innermost layer, creating one if needed.
    pub fn bind(&mut self, key: impl Into<String>, value: Value) {
        if self.layers.is_empty() {
            self.layers.push(IndexMap::new());
        }
        if let Some(top) = self.layers.last_mut() {
            top.insert(key.into(), value);
        }
    }

    /// Look up an identifier: innermost variable layer first, environment
    /// entries as the fallback.
    pub fn get(&self, name: &str) -> Option<Value> {
        for layer in self.layers.iter().rev() {
            if let Some(v) = layer.get(name) {
                return Some(v.clone());
            }
        }
        self.env.get(name).map(|s| Value::String(s.clone()))
    }

    /// True when a variable (not an environment entry) is bound.
    pub fn has_var(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.contains_key(name))
    }

    /// The string environment handed to shell-outs.
    pub fn env(&self) -> &IndexMap<String, String> {
        &self.env
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
