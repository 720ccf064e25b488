// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for loading, linting, and resolving pipeline documents

use crate::lint::LintIssue;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors while reading or decoding a pipeline file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid pipeline yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("pipeline declares both 'jobs:' and 'tasks:'; use one")]
    JobsAndTasks,
}

/// All reference problems found by the linter, reported together.
#[derive(Debug, Error)]
#[error("{}", format_issues(.issues))]
pub struct LintError {
    pub issues: Vec<LintIssue>,
}

fn format_issues(issues: &[LintIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("job '{}': {}: {}", i.job, i.issue, i.detail))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors while turning the jobs map into an execution order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("job not found: {0}")]
    UnknownJob(String),
    #[error("job '{job}' depends on '{dependency}' which does not exist")]
    MissingDependency { job: String, dependency: String },
    #[error("dependency cycle involving job '{0}'")]
    DependencyCycle(String),
}

/// A `requires:` variable was unbound at a loop/task invocation boundary.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("job '{job}' requires variables [{required}] but missing: [{missing}]")]
pub struct RequireError {
    pub job: String,
    pub required: String,
    pub missing: String,
}
