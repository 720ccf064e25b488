// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn job(yaml: &str) -> Job {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn bare_string_is_single_command_passthru() {
    let mut j = job("make test");
    assert_eq!(j.cmd.as_deref(), Some("make test"));
    assert!(j.passthru);

    j.normalize();
    assert_eq!(j.steps.len(), 1);
    assert_eq!(j.steps[0].run.as_deref(), Some("make test"));
    assert!(j.steps[0].passthru);
    assert!(j.cmd.is_none());
}

#[test]
fn full_mapping_decodes() {
    let j = job(
        r#"
description: build the project
runs_on: linux
if: ci
depends_on: setup
timeout: 10m
detach: true
summarize: true
steps:
  - echo one
  - {run: echo two}
"#,
    );
    assert_eq!(j.description.as_deref(), Some("build the project"));
    assert_eq!(j.runs_on.as_deref(), Some("linux"));
    assert_eq!(j.condition.as_deref(), Some("ci"));
    assert_eq!(j.depends_on.0, vec!["setup".to_string()]);
    assert_eq!(j.timeout.as_deref(), Some("10m"));
    assert!(j.detach);
    assert!(j.summarize);
    assert_eq!(j.steps.len(), 2);
}

#[test]
fn depends_on_sequence_form() {
    let j = job("{run: make, depends_on: [a, b]}");
    assert_eq!(j.depends_on.0, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn cmds_normalize_into_one_step() {
    let mut j = job("{cmds: [echo a, echo b]}");
    j.normalize();
    assert_eq!(j.steps.len(), 1);
    assert_eq!(j.steps[0].cmds, vec!["echo a".to_string(), "echo b".to_string()]);
}

#[test]
fn explicit_steps_suppress_cmd_normalization() {
    let mut j = job("{cmd: ignored, steps: [echo real]}");
    j.normalize();
    assert_eq!(j.steps.len(), 1);
    assert_eq!(j.steps[0].run.as_deref(), Some("echo real"));
}

#[test]
fn services_parse_but_stay_inert() {
    let j = job(
        r#"
run: make test
services:
  db:
    image: postgres:16
    ports: ["5432:5432"]
"#,
    );
    assert_eq!(j.services.len(), 1);
    assert_eq!(
        j.services.get("db").and_then(|s| s.image.as_deref()),
        Some("postgres:16")
    );
}

#[yare::parameterized(
    default_root    = { None, false, true },
    default_nested  = { None, true, false },
    forced_show     = { Some(true), true, true },
    forced_hide     = { Some(false), false, false },
)]
fn visibility_tri_state(show: Option<bool>, nested: bool, expected: bool) {
    let j = Job {
        show,
        nested,
        ..Job::default()
    };
    assert_eq!(j.visible(), expected);
}

#[test]
fn depth_counts_name_segments() {
    let j = Job {
        name: "deploy:staging:db".to_string(),
        ..Job::default()
    };
    assert_eq!(j.depth(), 2);
}
