// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use atkins_expr::InterpolateError;
use atkins_pipeline::{LintError, LoadError, RequireError, ResolveError};
use atkins_shell::ShellError;
use thiserror::Error;

/// Errors raised while executing a pipeline.
///
/// Lint, load, and resolve problems abort before execution starts. During
/// execution the first non-cancellation, non-deferred failure wins; deferred
/// step errors are logged but never overwrite it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Lint(#[from] LintError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("cycle detected involving variable {0}")]
    VariableCycle(String),
    #[error(transparent)]
    Require(#[from] RequireError),
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
    #[error(transparent)]
    Shell(#[from] ShellError),
    /// A command exited non-zero.
    #[error("{message}")]
    Exec {
        message: String,
        /// Captured stderr (stdout when stderr is empty).
        output: String,
        exit_code: i32,
        /// Identifies where in the tree the failure happened.
        trace: String,
    },
    /// Deadline exceeded or parent cancellation.
    #[error("cancelled: {0}")]
    Cancelled(String),
    #[error("invalid condition '{condition}': {message}")]
    Condition { condition: String, message: String },
    #[error("invalid for loop '{header}': {message}")]
    Loop { header: String, message: String },
    #[error("failed to write event log: {0}")]
    LogWrite(#[source] std::io::Error),
}

impl EngineError {
    /// Exit code this failure maps to at the process boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            EngineError::Exec { exit_code, .. } => *exit_code,
            EngineError::Interpolate(InterpolateError::Shell { exit_code, .. }) => *exit_code,
            _ => 1,
        }
    }

    /// Captured output of the failing command, when there is one.
    pub fn output(&self) -> Option<&str> {
        match self {
            EngineError::Exec { output, .. } => Some(output),
            EngineError::Interpolate(InterpolateError::Shell { output, .. }) => Some(output),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled(_))
    }
}
