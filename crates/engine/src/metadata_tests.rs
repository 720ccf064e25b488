// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use atkins_shell::FakeShell;

#[yare::parameterized(
    ssh            = { "git@github.com:octo/widgets.git", Some("octo/widgets") },
    https          = { "https://github.com/octo/widgets.git", Some("octo/widgets") },
    https_no_git   = { "https://gitlab.com/octo/widgets", Some("octo/widgets") },
    deep_path      = { "https://host.example/group/sub/widgets.git", Some("sub/widgets") },
    bare_word      = { "widgets", None },
)]
fn repository_slugs(remote: &str, expected: Option<&str>) {
    assert_eq!(repository_slug(remote).as_deref(), expected);
}

#[test]
fn run_ids_sort_by_creation_time() {
    let a = new_run_id();
    let b = new_run_id();
    // Zero-padded seconds prefix keeps lexical order aligned with time.
    assert!(b >= a, "{b} must sort at or after {a}");
    assert_eq!(a.split('-').next().map(str::len), Some(12));
}

#[tokio::test]
async fn git_metadata_comes_from_the_shell_seam() {
    let shell = FakeShell::new();
    shell.respond("git rev-parse HEAD", "abc123\n");
    shell.respond("git rev-parse --abbrev-ref HEAD", "main\n");
    shell.respond("git remote get-url origin", "git@github.com:octo/widgets.git\n");

    let env = indexmap::IndexMap::new();
    let meta = capture_metadata(&shell, &env, "demo", None).await;

    let git = meta.git.unwrap();
    assert_eq!(git.commit.as_deref(), Some("abc123"));
    assert_eq!(git.branch.as_deref(), Some("main"));
    assert_eq!(git.repository.as_deref(), Some("octo/widgets"));
    assert_eq!(meta.pipeline, "demo");
}

#[tokio::test]
async fn failing_git_commands_degrade_to_absent_fields() {
    let shell = FakeShell::new();
    shell.respond_failure("git rev-parse HEAD", "not a repository", 128);
    shell.respond_failure("git rev-parse --abbrev-ref HEAD", "not a repository", 128);
    shell.respond_failure("git remote get-url origin", "not a repository", 128);

    let env = indexmap::IndexMap::new();
    let meta = capture_metadata(&shell, &env, "demo", None).await;
    assert!(meta.git.is_none());
}

#[test]
fn module_path_reads_nearest_package_name() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src/deep");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"widgets\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();
    assert_eq!(module_path(&nested).as_deref(), Some("widgets"));
}

#[test]
fn workspace_manifest_without_package_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("member");
    std::fs::create_dir_all(&inner).unwrap();
    std::fs::write(dir.path().join("Cargo.toml"), "[workspace]\nmembers = []\n").unwrap();
    std::fs::write(
        inner.join("Cargo.toml"),
        "[package]\nname = \"member-crate\"\n",
    )
    .unwrap();
    assert_eq!(module_path(&inner).as_deref(), Some("member-crate"));
}
