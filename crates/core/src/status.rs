// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node execution status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a tree node.
///
/// `Conditional` marks a step guarded by an unevaluated `if:`; it resolves
/// to `Running`/`Skipped` once the guard is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
    Conditional,
}

impl Status {
    /// Textual label used in renders and the serialized event log.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Running => "running",
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::Skipped => "skipped",
            Status::Conditional => "conditional",
        }
    }

    /// Single-cell glyph shown before the node label.
    pub fn glyph(&self) -> &'static str {
        match self {
            Status::Pending => "·",
            Status::Running => "»",
            Status::Passed => "✔",
            Status::Failed => "✘",
            Status::Skipped => "○",
            Status::Conditional => "?",
        }
    }

    /// True once the node can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Passed | Status::Failed | Status::Skipped)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
