// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn jobs_get_names_and_nested_marks() {
    let doc = parse(
        r#"
name: demo
jobs:
  build:
    run: make
  deploy:staging:
    run: make deploy
"#,
    )
    .unwrap();
    let build = doc.jobs.get("build").unwrap();
    assert_eq!(build.name, "build");
    assert!(!build.nested);
    let staging = doc.jobs.get("deploy:staging").unwrap();
    assert_eq!(staging.name, "deploy:staging");
    assert!(staging.nested);
}

#[test]
fn tasks_is_a_synonym_for_jobs() {
    let doc = parse(
        r#"
tasks:
  lint: cargo clippy
"#,
    )
    .unwrap();
    assert!(doc.jobs.contains_key("lint"));
}

#[test]
fn both_jobs_and_tasks_is_an_error() {
    let err = parse(
        r#"
jobs:
  a: echo a
tasks:
  b: echo b
"#,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::JobsAndTasks));
}

#[test]
fn bare_string_jobs_normalize_to_steps() {
    let doc = parse("jobs: {hello: echo hi}").unwrap();
    let job = doc.jobs.get("hello").unwrap();
    assert_eq!(job.steps.len(), 1);
    assert_eq!(job.steps[0].run.as_deref(), Some("echo hi"));
    assert!(job.steps[0].passthru);
}

#[test]
fn invalid_yaml_is_fatal() {
    assert!(matches!(parse("jobs: ["), Err(LoadError::Yaml(_))));
}

#[test]
fn step_defer_conflict_is_fatal_at_load() {
    let err = parse(
        r#"
jobs:
  bad:
    steps:
      - {run: echo hi, defer: echo bye}
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("defer"), "got: {err}");
}

#[test]
fn pipeline_vars_decode_as_values() {
    let doc = parse(
        r#"
name: demo
vars:
  greeting: hello
  count: 3
  hosts: [a, b]
jobs:
  noop: 'true'
"#,
    )
    .unwrap();
    assert_eq!(doc.vars.len(), 3);
    assert_eq!(
        doc.vars.get("count"),
        Some(&atkins_core::Value::Int(3))
    );
}

#[test]
fn load_file_reports_missing_path() {
    let err = load_file("/nonexistent/atkins.yml").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn load_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atkins.yml");
    std::fs::write(&path, "name: fromdisk\njobs: {a: echo hi}\n").unwrap();
    let doc = load_file(&path).unwrap();
    assert_eq!(doc.name, "fromdisk");
}
