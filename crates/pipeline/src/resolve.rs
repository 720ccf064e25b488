// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution-order resolution over `depends_on`

use crate::document::Pipeline;
use crate::error::{RequireError, ResolveError};
use crate::job::Job;
use atkins_core::Scope;
use std::collections::HashSet;

/// Produce the job execution order, dependencies first.
///
/// The starting set is the named job when given, else a job called
/// `default`, else every root-level job in display order. Each start's
/// `depends_on` closure is walked depth-first post-order, so leaves land
/// before dependents. Nested jobs only appear when reached through a
/// dependency.
pub fn resolve_order(
    pipeline: &Pipeline,
    start: Option<&str>,
) -> Result<Vec<String>, ResolveError> {
    let starts: Vec<String> = match start {
        Some(name) => {
            if !pipeline.jobs.contains_key(name) {
                return Err(ResolveError::UnknownJob(name.to_string()));
            }
            vec![name.to_string()]
        }
        None if pipeline.jobs.contains_key("default") => vec!["default".to_string()],
        None => {
            let mut roots: Vec<&Job> = pipeline.root_jobs().collect();
            roots.sort_by(|a, b| a.depth().cmp(&b.depth()).then(a.name.cmp(&b.name)));
            roots.iter().map(|j| j.name.clone()).collect()
        }
    };

    let mut order = Vec::new();
    let mut done = HashSet::new();
    let mut in_stack = HashSet::new();
    for name in &starts {
        visit(pipeline, name, &mut order, &mut done, &mut in_stack)?;
    }
    Ok(order)
}

fn visit(
    pipeline: &Pipeline,
    name: &str,
    order: &mut Vec<String>,
    done: &mut HashSet<String>,
    in_stack: &mut HashSet<String>,
) -> Result<(), ResolveError> {
    if done.contains(name) {
        return Ok(());
    }
    if !in_stack.insert(name.to_string()) {
        return Err(ResolveError::DependencyCycle(name.to_string()));
    }

    let Some(job) = pipeline.jobs.get(name) else {
        return Err(ResolveError::UnknownJob(name.to_string()));
    };
    for dep in job.depends_on.iter() {
        if !pipeline.jobs.contains_key(dep) {
            return Err(ResolveError::MissingDependency {
                job: name.to_string(),
                dependency: dep.to_string(),
            });
        }
        visit(pipeline, dep, order, done, in_stack)?;
    }

    in_stack.remove(name);
    done.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}

/// Rendering order for job names: depth (count of `:`) first, then
/// lexicographic, so root jobs come first with nested ones grouped after.
pub fn display_order(names: &mut [String]) {
    names.sort_by(|a, b| {
        let da = a.matches(':').count();
        let db = b.matches(':').count();
        da.cmp(&db).then_with(|| a.cmp(b))
    });
}

/// Assert every `requires:` variable is bound before a loop or `task:`
/// invocation enters the job.
pub fn validate_job_requirements(job: &Job, scope: &Scope) -> Result<(), RequireError> {
    let missing: Vec<&str> = job
        .requires
        .iter()
        .map(String::as_str)
        .filter(|name| !scope.has_var(name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    Err(RequireError {
        job: job.name.clone(),
        required: job.requires.join(" "),
        missing: missing.join(" "),
    })
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
