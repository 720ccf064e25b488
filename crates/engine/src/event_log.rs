// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-run event log
//!
//! Events accumulate in memory in wall-clock completion order; the log file
//! is written exactly once at pipeline termination as YAML:
//! `{metadata, state, events, summary}`. Without a file path the logger
//! still collects events (the summary needs them) but writes nothing.

use crate::error::EngineError;
use crate::metadata::RunMetadata;
use atkins_core::{ExecEvent, ExecResult};
use atkins_tree::NodeSnapshot;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Thread-safe exec/event recorder.
pub struct Logger {
    file_path: Option<PathBuf>,
    debug: bool,
    start: Instant,
    events: Mutex<Vec<ExecEvent>>,
}

/// Counts and result of the whole run, included in the log document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub duration: f64,
    pub total_steps: usize,
    pub passed_steps: usize,
    pub failed_steps: usize,
    pub skipped_steps: usize,
    pub result: ExecResult,
}

#[derive(Serialize)]
struct StateSection<'a> {
    tree: &'a NodeSnapshot,
}

#[derive(Serialize)]
struct LogDocument<'a> {
    metadata: &'a RunMetadata,
    state: StateSection<'a>,
    events: &'a [ExecEvent],
    summary: &'a Summary,
}

impl Logger {
    pub fn new(file_path: Option<PathBuf>, debug: bool) -> Self {
        Self {
            file_path,
            debug,
            start: Instant::now(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn start_time(&self) -> Instant {
        self.start
    }

    /// Seconds since the pipeline started.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Append one finished exec. Thread-safe; order is completion order.
    pub fn log_exec(
        &self,
        result: ExecResult,
        id: &str,
        run: &str,
        start_offset: f64,
        duration: f64,
        error: Option<String>,
    ) {
        let thread_id = self
            .debug
            .then(|| format!("{:?}", std::thread::current().id()));
        let event = ExecEvent {
            id: id.to_string(),
            run: run.to_string(),
            result,
            start: start_offset,
            duration,
            error,
            thread_id,
        };
        tracing::debug!(id = %event.id, result = ?event.result, "exec finished");
        self.events.lock().push(event);
    }

    /// Copy of the events recorded so far.
    pub fn events(&self) -> Vec<ExecEvent> {
        self.events.lock().clone()
    }

    /// Step counts derived from the recorded step events (`*.steps.*` ids).
    pub fn summarize(&self, result: ExecResult) -> Summary {
        let events = self.events.lock();
        let steps: Vec<&ExecEvent> = events
            .iter()
            .filter(|e| e.id.contains(".steps."))
            .collect();
        Summary {
            duration: self.elapsed(),
            total_steps: steps.len(),
            passed_steps: steps
                .iter()
                .filter(|e| e.result == ExecResult::Pass)
                .count(),
            failed_steps: steps
                .iter()
                .filter(|e| e.result == ExecResult::Fail)
                .count(),
            skipped_steps: steps
                .iter()
                .filter(|e| e.result == ExecResult::Skipped)
                .count(),
            result,
        }
    }

    /// Serialize the final log document. No-op without a file path.
    pub fn write(
        &self,
        metadata: &RunMetadata,
        final_state: &NodeSnapshot,
        summary: &Summary,
    ) -> Result<(), EngineError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let events = self.events.lock();
        let doc = LogDocument {
            metadata,
            state: StateSection { tree: final_state },
            events: &events,
            summary,
        };
        let yaml = serde_yaml::to_string(&doc)
            .map_err(|e| EngineError::LogWrite(std::io::Error::other(e)))?;
        std::fs::write(path, yaml).map_err(EngineError::LogWrite)?;
        tracing::info!(path = %path.display(), events = events.len(), "event log written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "event_log_tests.rs"]
mod tests;
