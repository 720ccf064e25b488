// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level pipeline document

use crate::envdecl::EnvDecl;
use crate::job::Job;
use atkins_core::Value;
use indexmap::IndexMap;
use serde::Deserialize;

/// A pipeline: display name, shared variables, environment declaration, and
/// a map of jobs. `tasks:` is a synonym for `jobs:`; the loader merges the
/// two and rejects documents using both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vars: IndexMap<String, Value>,
    #[serde(default)]
    pub env: Option<EnvDecl>,
    #[serde(default)]
    pub jobs: IndexMap<String, Job>,
    #[serde(default)]
    pub(crate) tasks: IndexMap<String, Job>,
}

impl Pipeline {
    pub fn get_job(&self, name: &str) -> Option<&Job> {
        self.jobs.get(name)
    }

    /// Root-level jobs: names without a `:` segment.
    pub fn root_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter(|j| !j.nested)
    }
}
