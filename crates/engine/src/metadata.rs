// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run metadata for the event log

use atkins_shell::ShellRunner;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifies one pipeline run in the serialized log.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RunMetadata {
    /// Monotonic, lexically sortable: zero-padded unix seconds plus a
    /// random suffix.
    pub run_id: String,
    /// Unix seconds at pipeline start.
    pub created_at: u64,
    pub pipeline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Package name from the nearest Cargo.toml walking up from cwd.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitInfo>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct GitInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// `user/repo` slug extracted from the remote url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

pub(crate) fn new_run_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{:012}-{}", secs, &suffix[..8])
}

/// Capture run metadata: run id, module descriptor, and best-effort git
/// info via the shell seam. Git failures (not a repository, no remote)
/// degrade to absent fields.
pub async fn capture_metadata(
    shell: &dyn ShellRunner,
    env: &IndexMap<String, String>,
    pipeline: &str,
    file: Option<&Path>,
) -> RunMetadata {
    let created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let commit = git_value(shell, env, "git rev-parse HEAD").await;
    let branch = git_value(shell, env, "git rev-parse --abbrev-ref HEAD").await;
    let remote_url = git_value(shell, env, "git remote get-url origin").await;
    let repository = remote_url.as_deref().and_then(repository_slug);
    let git = (commit.is_some() || branch.is_some() || remote_url.is_some()).then_some(GitInfo {
        commit,
        branch,
        remote_url,
        repository,
    });

    RunMetadata {
        run_id: new_run_id(),
        created_at,
        pipeline: pipeline.to_string(),
        file: file.map(|p| p.display().to_string()),
        module_path: module_path(&std::env::current_dir().unwrap_or_default()),
        git,
    }
}

async fn git_value(
    shell: &dyn ShellRunner,
    env: &IndexMap<String, String>,
    command: &str,
) -> Option<String> {
    let output = shell.run(command, env, false).await.ok()?;
    if !output.success() {
        return None;
    }
    let value = output.stdout.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `user/repo` from ssh (`git@host:user/repo.git`) or https
/// (`https://host/user/repo.git`) remotes.
fn repository_slug(remote: &str) -> Option<String> {
    let trimmed = remote.trim().trim_end_matches(".git");
    let path = if let Some((_, after)) = trimmed.split_once(':') {
        // ssh form, unless this was a URL scheme
        if after.starts_with("//") {
            let after = after.trim_start_matches('/');
            after.split_once('/').map(|(_, p)| p)?
        } else {
            after
        }
    } else {
        trimmed.split_once('/').map(|(_, p)| p)?
    };
    let mut segments = path.rsplitn(2, '/');
    let repo = segments.next()?;
    let user = segments.next()?;
    if repo.is_empty() || user.is_empty() {
        return None;
    }
    let user = user.rsplit('/').next().unwrap_or(user);
    Some(format!("{}/{}", user, repo))
}

/// Package name from the nearest Cargo.toml with a `[package]` table,
/// walking from `start` toward the filesystem root.
fn module_path(start: &Path) -> Option<String> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let manifest = current.join("Cargo.toml");
        if manifest.is_file() {
            if let Ok(content) = std::fs::read_to_string(&manifest) {
                if let Ok(value) = content.parse::<toml::Table>() {
                    if let Some(name) = value
                        .get("package")
                        .and_then(|p| p.get("name"))
                        .and_then(|n| n.as_str())
                    {
                        return Some(name.to_string());
                    }
                }
            }
        }
        dir = current.parent();
    }
    None
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
