// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::loader::parse;
use indexmap::IndexMap;

#[test]
fn dependencies_come_before_dependents() {
    let doc = parse(
        r#"
jobs:
  b:
    run: echo b
    depends_on: a
  a: echo a
"#,
    )
    .unwrap();
    let order = resolve_order(&doc, None).unwrap();
    assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn explicit_start_limits_the_chain() {
    let doc = parse(
        r#"
jobs:
  a: echo a
  b:
    run: echo b
    depends_on: a
  c: echo c
"#,
    )
    .unwrap();
    let order = resolve_order(&doc, Some("b")).unwrap();
    assert_eq!(order, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn default_job_wins_when_present() {
    let doc = parse(
        r#"
jobs:
  other: echo other
  default:
    run: echo default
    depends_on: other
"#,
    )
    .unwrap();
    let order = resolve_order(&doc, None).unwrap();
    assert_eq!(order, vec!["other".to_string(), "default".to_string()]);
}

#[test]
fn roots_traverse_in_name_order_without_duplicates() {
    let doc = parse(
        r#"
jobs:
  z:
    run: echo z
    depends_on: shared
  a:
    run: echo a
    depends_on: shared
  shared: echo shared
"#,
    )
    .unwrap();
    let order = resolve_order(&doc, None).unwrap();
    assert_eq!(
        order,
        vec!["shared".to_string(), "a".to_string(), "z".to_string()]
    );
}

#[test]
fn nested_jobs_only_appear_via_dependencies() {
    let doc = parse(
        r#"
jobs:
  deploy:
    run: echo deploy
    depends_on: "deploy:prep"
  deploy:prep: echo prep
"#,
    )
    .unwrap();
    let order = resolve_order(&doc, None).unwrap();
    assert_eq!(
        order,
        vec!["deploy:prep".to_string(), "deploy".to_string()]
    );

    let doc = parse("jobs: {visible: echo v, 'hidden:one': echo h}").unwrap();
    let order = resolve_order(&doc, None).unwrap();
    assert_eq!(order, vec!["visible".to_string()]);
}

#[test]
fn unknown_start_job_errors() {
    let doc = parse("jobs: {a: echo a}").unwrap();
    assert_eq!(
        resolve_order(&doc, Some("ghost")),
        Err(ResolveError::UnknownJob("ghost".to_string()))
    );
}

#[test]
fn missing_dependency_errors() {
    let doc = parse("jobs: {a: {run: echo, depends_on: ghost}}").unwrap();
    assert_eq!(
        resolve_order(&doc, None),
        Err(ResolveError::MissingDependency {
            job: "a".to_string(),
            dependency: "ghost".to_string(),
        })
    );
}

#[test]
fn dependency_cycles_are_detected() {
    let doc = parse(
        r#"
jobs:
  a:
    run: echo a
    depends_on: b
  b:
    run: echo b
    depends_on: a
"#,
    )
    .unwrap();
    assert!(matches!(
        resolve_order(&doc, None),
        Err(ResolveError::DependencyCycle(_))
    ));
}

#[test]
fn display_order_sorts_depth_then_name() {
    let mut names = vec![
        "deploy:staging".to_string(),
        "build".to_string(),
        "deploy".to_string(),
        "deploy:prod".to_string(),
    ];
    display_order(&mut names);
    assert_eq!(
        names,
        vec![
            "build".to_string(),
            "deploy".to_string(),
            "deploy:prod".to_string(),
            "deploy:staging".to_string(),
        ]
    );
}

#[test]
fn requirements_pass_when_bound() {
    let job = Job {
        name: "greet".to_string(),
        requires: vec!["who".to_string()],
        ..Job::default()
    };
    let vars: IndexMap<String, atkins_core::Value> =
        [("who".to_string(), atkins_core::Value::String("ada".into()))]
            .into_iter()
            .collect();
    let scope = Scope::new().overlay(vars);
    assert!(validate_job_requirements(&job, &scope).is_ok());
}

#[test]
fn requirements_error_names_the_missing_subset() {
    let job = Job {
        name: "greet".to_string(),
        requires: vec!["a".to_string(), "b".to_string()],
        ..Job::default()
    };
    let vars: IndexMap<String, atkins_core::Value> =
        [("b".to_string(), atkins_core::Value::Int(1))]
            .into_iter()
            .collect();
    let scope = Scope::new().overlay(vars);
    let err = validate_job_requirements(&job, &scope).unwrap_err();
    assert_eq!(
        err.to_string(),
        "job 'greet' requires variables [a b] but missing: [a]"
    );
}
