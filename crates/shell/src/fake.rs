// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted shell for tests

use crate::runner::{ShellError, ShellOutput, ShellRunner};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A [`ShellRunner`] that replays canned outputs and records every call.
///
/// Commands without a scripted response succeed with empty output, so tests
/// only script the commands whose output matters.
#[derive(Clone, Default)]
pub struct FakeShell {
    responses: Arc<Mutex<HashMap<String, ShellOutput>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful response for an exact command string.
    pub fn respond(&self, command: impl Into<String>, stdout: impl Into<String>) {
        self.responses.lock().insert(
            command.into(),
            ShellOutput {
                stdout: stdout.into(),
                stderr: String::new(),
                exit_code: 0,
            },
        );
    }

    /// Script a failing response for an exact command string.
    pub fn respond_failure(
        &self,
        command: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: i32,
    ) {
        self.responses.lock().insert(
            command.into(),
            ShellOutput {
                stdout: String::new(),
                stderr: stderr.into(),
                exit_code,
            },
        );
    }

    /// Every command string that reached the runner, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ShellRunner for FakeShell {
    async fn run(
        &self,
        command: &str,
        _env: &IndexMap<String, String>,
        _tty: bool,
    ) -> Result<ShellOutput, ShellError> {
        self.calls.lock().push(command.to_string());
        let scripted = self.responses.lock().get(command).cloned();
        Ok(scripted.unwrap_or_default())
    }
}
