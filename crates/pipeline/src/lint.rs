// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference linting for pipeline documents

use crate::document::Pipeline;
use crate::error::LintError;

/// One reference problem found in a job definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub job: String,
    pub issue: String,
    pub detail: String,
}

/// Check every `depends_on:` and step `task:` reference. All problems are
/// collected so the author fixes them in one pass.
pub fn lint(pipeline: &Pipeline) -> Result<(), LintError> {
    let mut issues = Vec::new();

    for job in pipeline.jobs.values() {
        for dep in job.depends_on.iter() {
            if !pipeline.jobs.contains_key(dep) {
                issues.push(LintIssue {
                    job: job.name.clone(),
                    issue: "missing dependency".to_string(),
                    detail: format!("depends_on '{}' does not exist", dep),
                });
            }
        }
        for (index, step) in job.steps.iter().enumerate() {
            if let Some(task) = &step.task {
                if !pipeline.jobs.contains_key(task) {
                    issues.push(LintIssue {
                        job: job.name.clone(),
                        issue: "missing task".to_string(),
                        detail: format!("step {} invokes task '{}' which does not exist", index, task),
                    });
                }
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(LintError { issues })
    }
}

#[cfg(test)]
#[path = "lint_tests.rs"]
mod tests;
