// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job definitions

use crate::envdecl::{Dependencies, EnvDecl};
use crate::service::Service;
use crate::step::Step;
use atkins_core::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A named group of steps with dependencies, vars, env, and timeout.
///
/// `name` and `nested` are stamped by the loader from the map key; a `:` in
/// the name marks the job nested (reachable only via `task:` or
/// `depends_on:`, hidden from the top of the tree by default).
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub name: String,
    pub description: Option<String>,
    /// Opaque placement tags; parsed, not acted on.
    pub runs_on: Option<String>,
    pub container: Option<String>,
    /// Pre-step guard expression.
    pub condition: Option<String>,
    /// Single-command shorthand; folded into `steps` by the loader.
    pub cmd: Option<String>,
    pub cmds: Vec<String>,
    pub steps: Vec<Step>,
    /// Declared service containers; parsed but never orchestrated.
    pub services: IndexMap<String, Service>,
    pub vars: IndexMap<String, Value>,
    pub env: Option<EnvDecl>,
    /// Run concurrently with other jobs instead of in list order.
    pub detach: bool,
    /// Tri-state visibility: force show, force hide, or default-by-nesting.
    pub show: Option<bool>,
    pub depends_on: Dependencies,
    /// Variables that must be bound when invoked via loop or `task:`.
    pub requires: Vec<String>,
    /// Wall-clock limit, e.g. `"10m"` or `"300s"`.
    pub timeout: Option<String>,
    /// Collapse child rendering into a `k/n` count.
    pub summarize: bool,
    /// Render captured output inline under the node.
    pub passthru: bool,
    pub nested: bool,
}

#[derive(Deserialize)]
struct JobSpec {
    #[serde(default, alias = "desc")]
    description: Option<String>,
    #[serde(default)]
    runs_on: Option<String>,
    #[serde(default)]
    container: Option<String>,
    #[serde(default, rename = "if")]
    condition: Option<String>,
    #[serde(default, alias = "run")]
    cmd: Option<String>,
    #[serde(default)]
    cmds: Vec<String>,
    #[serde(default)]
    steps: Vec<Step>,
    #[serde(default)]
    services: IndexMap<String, Service>,
    #[serde(default)]
    vars: IndexMap<String, Value>,
    #[serde(default)]
    env: Option<EnvDecl>,
    #[serde(default)]
    detach: bool,
    #[serde(default)]
    show: Option<bool>,
    #[serde(default)]
    depends_on: Dependencies,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    timeout: Option<String>,
    #[serde(default)]
    summarize: bool,
    #[serde(default)]
    passthru: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobRepr {
    /// `job: echo hi` — a single-step passthru job running that string.
    Short(String),
    Full(Box<JobSpec>),
}

impl<'de> Deserialize<'de> for Job {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = JobRepr::deserialize(d)?;
        Ok(match raw {
            JobRepr::Short(command) => Job {
                cmd: Some(command.trim_end().to_string()),
                passthru: true,
                ..Job::default()
            },
            JobRepr::Full(spec) => Job {
                name: String::new(),
                description: spec.description,
                runs_on: spec.runs_on,
                container: spec.container,
                condition: spec.condition,
                cmd: spec.cmd.map(|s| s.trim_end().to_string()),
                cmds: spec.cmds.iter().map(|s| s.trim_end().to_string()).collect(),
                steps: spec.steps,
                services: spec.services,
                vars: spec.vars,
                env: spec.env,
                detach: spec.detach,
                show: spec.show,
                depends_on: spec.depends_on,
                requires: spec.requires,
                timeout: spec.timeout,
                summarize: spec.summarize,
                passthru: spec.passthru,
                nested: false,
            },
        })
    }
}

impl Job {
    /// Fold the job-level `cmd`/`cmds` shorthand into a synthesized step so
    /// execution and rendering only deal with `steps`.
    pub(crate) fn normalize(&mut self) {
        if !self.steps.is_empty() {
            return;
        }
        if let Some(cmd) = self.cmd.take() {
            let mut step = Step::from_command(cmd);
            step.passthru = self.passthru;
            self.steps.push(step);
        } else if !self.cmds.is_empty() {
            let cmds = std::mem::take(&mut self.cmds);
            self.steps.push(Step {
                name: Some(cmds.join(" && ")),
                cmds,
                passthru: self.passthru,
                ..Step::default()
            });
        }
    }

    /// Whether the job appears at the top of the tree: `show` wins when
    /// set, otherwise nested jobs are hidden.
    pub fn visible(&self) -> bool {
        self.show.unwrap_or(!self.nested)
    }

    /// Rendering depth: nesting segments in the name.
    pub fn depth(&self) -> usize {
        self.name.matches(':').count()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
