// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution events recorded by the runner

use serde::{Deserialize, Serialize};

/// Outcome of a single exec (step, loop iteration, task invocation, or job).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecResult {
    Pass,
    Fail,
    Skipped,
}

/// One entry in the post-run event log.
///
/// `id` addresses the exec within the pipeline (`jobs.<name>` for jobs,
/// `jobs.<name>.steps.<n>` for steps, monotonic within the job). `start` and
/// `duration` are seconds relative to pipeline start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecEvent {
    pub id: String,
    /// The command or job that ran, after interpolation.
    pub run: String,
    pub result: ExecResult,
    pub start: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Scheduler thread that ran the exec; recorded only in debug mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
