// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step definitions
//!
//! A step is a single executable unit: a shell command (`run`/`cmd`), a
//! command list (`cmds`), or a `task:` invocation of another job. Three
//! shorthand forms are resolved at decode time:
//!
//!   - `"echo hi"`            ⇒ `{run: "echo hi", name: "echo hi"}`
//!   - `{defer: <step form>}` ⇒ the inner step with `deferred: true`
//!   - `{run: ..., defer: ...}` is a decode error

use crate::envdecl::EnvDecl;
use atkins_core::Value;
use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Clone, Default)]
pub struct Step {
    pub name: Option<String>,
    pub desc: Option<String>,
    /// Shell command (`run:` or its synonym `cmd:`), right-trimmed.
    pub run: Option<String>,
    /// Command list; the executor joins these with `&&`.
    pub cmds: Vec<String>,
    /// Invoke another job by name.
    pub task: Option<String>,
    /// Pre-execution guard expression.
    pub condition: Option<String>,
    /// Loop header, e.g. `item in ${{ list }}`.
    pub for_each: Option<String>,
    pub env: Option<EnvDecl>,
    /// Arguments for a `uses:` reference.
    pub with: IndexMap<String, Value>,
    /// Opaque reusable-action reference; carried, not executed.
    pub uses: Option<String>,
    pub detach: bool,
    /// Runs at job exit in LIFO order, regardless of outcome.
    pub deferred: bool,
    pub verbose: bool,
    pub summarize: bool,
    pub passthru: bool,
    /// Allocate a pseudo-terminal for the command.
    pub tty: bool,
}

/// The structured mapping form; shorthands are handled before this decode.
#[derive(Debug, Default, Deserialize)]
struct StepSpec {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default, alias = "cmd")]
    run: Option<String>,
    #[serde(default)]
    cmds: Vec<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default, rename = "if")]
    condition: Option<String>,
    #[serde(default, rename = "for")]
    for_each: Option<String>,
    #[serde(default)]
    env: Option<EnvDecl>,
    #[serde(default)]
    with: IndexMap<String, Value>,
    #[serde(default)]
    uses: Option<String>,
    #[serde(default)]
    detach: bool,
    #[serde(default)]
    deferred: bool,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    summarize: bool,
    #[serde(default)]
    passthru: bool,
    #[serde(default)]
    tty: bool,
}

const EXEC_KEYS: &[&str] = &["run", "cmd", "cmds", "task"];

impl Step {
    /// The bare-string shorthand: run the command, labeled by its text.
    pub fn from_command(command: impl Into<String>) -> Self {
        let command = command.into().trim_end().to_string();
        Step {
            name: Some(command.clone()),
            run: Some(command),
            ..Step::default()
        }
    }

    /// Label for tree nodes: explicit name, else the command or task text.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(run) = &self.run {
            return run.clone();
        }
        if let Some(task) = &self.task {
            return format!("task: {}", task);
        }
        if !self.cmds.is_empty() {
            return self.cmds.join(" && ");
        }
        if let Some(uses) = &self.uses {
            return format!("uses: {}", uses);
        }
        "step".to_string()
    }

    fn from_yaml(raw: serde_yaml::Value) -> Result<Self, String> {
        match raw {
            serde_yaml::Value::String(command) => Ok(Step::from_command(command)),
            serde_yaml::Value::Mapping(map) => {
                let mut fields: Vec<(String, serde_yaml::Value)> = Vec::new();
                for (key, value) in map {
                    match key.as_str() {
                        Some(name) => fields.push((name.to_string(), value)),
                        None => return Err("step keys must be strings".to_string()),
                    }
                }
                let has_key = |name: &str| fields.iter().any(|(k, _)| k == name);

                if has_key("defer") {
                    for key in EXEC_KEYS {
                        if has_key(key) {
                            return Err(format!(
                                "step cannot combine '{}:' with 'defer:'",
                                key
                            ));
                        }
                    }
                    if fields.len() > 1 {
                        return Err("a 'defer:' step carries its fields inside the defer value"
                            .to_string());
                    }
                    let inner = fields
                        .into_iter()
                        .next()
                        .map(|(_, v)| v)
                        .unwrap_or(serde_yaml::Value::Null);
                    let mut step = Step::from_yaml(inner)?;
                    step.deferred = true;
                    Ok(step)
                } else {
                    let mapping: serde_yaml::Mapping = fields
                        .into_iter()
                        .map(|(k, v)| (serde_yaml::Value::String(k), v))
                        .collect();
                    let spec: StepSpec =
                        serde_yaml::from_value(serde_yaml::Value::Mapping(mapping))
                            .map_err(|e| e.to_string())?;
                    Step::from_spec(spec)
                }
            }
            _ => Err("step must be a string or a mapping".to_string()),
        }
    }

    fn from_spec(spec: StepSpec) -> Result<Self, String> {
        let run = spec.run.map(|s| s.trim_end().to_string());
        let cmds: Vec<String> = spec
            .cmds
            .iter()
            .map(|s| s.trim_end().to_string())
            .collect();

        let exec_forms = usize::from(run.is_some())
            + usize::from(!cmds.is_empty())
            + usize::from(spec.task.is_some());
        if exec_forms > 1 {
            return Err("step specifies more than one of run/cmds/task".to_string());
        }
        if exec_forms == 0 && spec.uses.is_none() {
            return Err("step has nothing to run (need run, cmds, task, or uses)".to_string());
        }

        Ok(Step {
            name: spec.name,
            desc: spec.desc,
            run,
            cmds,
            task: spec.task,
            condition: spec.condition,
            for_each: spec.for_each,
            env: spec.env,
            with: spec.with,
            uses: spec.uses,
            detach: spec.detach,
            deferred: spec.deferred,
            verbose: spec.verbose,
            summarize: spec.summarize,
            passthru: spec.passthru,
            tty: spec.tty,
        })
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = serde_yaml::Value::deserialize(d)?;
        Step::from_yaml(raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
