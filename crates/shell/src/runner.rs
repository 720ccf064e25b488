// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell execution interface

use async_trait::async_trait;
use indexmap::IndexMap;
use thiserror::Error;

/// Captured result of a finished shell command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Errors raised while launching a command. A command that runs and exits
/// non-zero is not an error at this layer; callers inspect
/// [`ShellOutput::exit_code`].
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to launch shell: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs a shell command string with an environment overlay.
///
/// `tty` asks for a pseudo-terminal so the child keeps emitting color and
/// sized updates; the production runner allocates one, test fakes may
/// ignore the flag.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(
        &self,
        command: &str,
        env: &IndexMap<String, String>,
        tty: bool,
    ) -> Result<ShellOutput, ShellError>;
}
