// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! POSIX `sh -c` runner

use crate::runner::{ShellError, ShellOutput, ShellRunner};
use async_trait::async_trait;
use indexmap::IndexMap;
use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, PtySize};
use std::io::Read;
use std::path::PathBuf;
use tokio::process::Command;

/// Production [`ShellRunner`] backed by `sh -c`.
///
/// The child environment is exactly the map handed in — the caller owns the
/// OS-environment snapshot and its overlays, so no process-level `setenv`
/// ever happens. With `tty: false` output is captured via pipes and
/// `kill_on_drop` ensures a command abandoned by a timeout or cancellation
/// does not outlive its step. With `tty: true` the child runs on a freshly
/// allocated pseudo-terminal, so `isatty()`-gated color and progress output
/// survives into the capture; a drop guard kills the child if the caller
/// abandons the run mid-flight.
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    cwd: Option<PathBuf>,
}

/// Kills the pty child unless disarmed, so cancelling the run future
/// cannot leak a running process.
struct KillOnDrop {
    killer: Option<Box<dyn ChildKiller + Send + Sync>>,
}

impl KillOnDrop {
    fn new(killer: Box<dyn ChildKiller + Send + Sync>) -> Self {
        Self {
            killer: Some(killer),
        }
    }

    fn disarm(&mut self) {
        self.killer = None;
    }
}

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        if let Some(mut killer) = self.killer.take() {
            let _ = killer.kill();
        }
    }
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands from `dir` instead of the process working directory.
    pub fn with_cwd(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
        }
    }

    async fn run_piped(
        &self,
        command: &str,
        env: &IndexMap<String, String>,
    ) -> Result<ShellOutput, ShellError> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd.env_clear().envs(env);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(true);

        let output = cmd.output().await?;

        Ok(ShellOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    async fn run_pty(
        &self,
        command: &str,
        env: &IndexMap<String, String>,
    ) -> Result<ShellOutput, ShellError> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| ShellError::Io(std::io::Error::other(e)))?;

        let mut cmd = CommandBuilder::new("sh");
        cmd.arg("-c");
        cmd.arg(command);
        cmd.env_clear();
        for (key, value) in env {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.cwd {
            cmd.cwd(dir);
        }

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ShellError::Io(std::io::Error::other(e)))?;
        // Close our copy of the slave end so the master reads EOF once the
        // child exits.
        drop(pair.slave);

        let mut guard = KillOnDrop::new(child.clone_killer());
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ShellError::Io(std::io::Error::other(e)))?;
        let master = pair.master;

        let joined = tokio::task::spawn_blocking(move || {
            let mut captured = Vec::new();
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => captured.extend_from_slice(&chunk[..n]),
                    // Linux reports EIO on the master once the slave side
                    // closes; that is end-of-output, not a failure.
                    Err(_) => break,
                }
            }
            let status = child.wait();
            drop(master);
            (captured, status)
        })
        .await;

        let (captured, status) =
            joined.map_err(|e| ShellError::Io(std::io::Error::other(e)))?;
        guard.disarm();
        let status = status?;

        Ok(ShellOutput {
            stdout: String::from_utf8_lossy(&captured).into_owned(),
            // A pty is a single stream; stderr arrives merged into stdout.
            stderr: String::new(),
            exit_code: status.exit_code() as i32,
        })
    }
}

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(
        &self,
        command: &str,
        env: &IndexMap<String, String>,
        tty: bool,
    ) -> Result<ShellOutput, ShellError> {
        tracing::debug!(%command, tty, "running shell command");
        if tty {
            self.run_pty(command, env).await
        } else {
            self.run_piped(command, env).await
        }
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
