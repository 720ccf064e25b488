// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline file loading

use crate::document::Pipeline;
use crate::error::LoadError;
use std::path::Path;

/// Decode a pipeline document from YAML source.
///
/// After decoding, every job gets its map key as its name; names containing
/// `:` are marked nested, and job-level `cmd`/`cmds` shorthands fold into a
/// synthesized step.
pub fn parse(source: &str) -> Result<Pipeline, LoadError> {
    let mut doc: Pipeline = serde_yaml::from_str(source)?;

    if !doc.jobs.is_empty() && !doc.tasks.is_empty() {
        return Err(LoadError::JobsAndTasks);
    }
    if doc.jobs.is_empty() {
        doc.jobs = std::mem::take(&mut doc.tasks);
    }

    for (key, job) in doc.jobs.iter_mut() {
        job.name = key.clone();
        job.nested = key.contains(':');
        job.normalize();
    }

    tracing::debug!(pipeline = %doc.name, jobs = doc.jobs.len(), "loaded pipeline");
    Ok(doc)
}

/// Read and decode a pipeline file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Pipeline, LoadError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
