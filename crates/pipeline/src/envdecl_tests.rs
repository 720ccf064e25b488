// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn dependencies_scalar_normalizes_to_list() {
    let deps: Dependencies = serde_yaml::from_str("build").unwrap();
    assert_eq!(deps.0, vec!["build".to_string()]);
}

#[test]
fn dependencies_sequence_passes_through() {
    let deps: Dependencies = serde_yaml::from_str("[a, b]").unwrap();
    assert_eq!(deps.0, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn structured_env_with_scalar_include() {
    let decl: EnvDecl = serde_yaml::from_str("{vars: {A: '1'}, include: .env}").unwrap();
    assert_eq!(decl.include, vec![".env".to_string()]);
    assert_eq!(decl.vars.len(), 1);
}

#[test]
fn structured_env_with_include_list() {
    let decl: EnvDecl =
        serde_yaml::from_str("{include: ['.env', '.env.local']}").unwrap();
    assert_eq!(decl.include.len(), 2);
    assert!(decl.vars.is_empty());
}

#[test]
fn vars_alone_is_valid() {
    let decl: EnvDecl = serde_yaml::from_str("{vars: {RUST_LOG: debug, CI: '1'}}").unwrap();
    assert!(decl.include.is_empty());
    assert_eq!(decl.vars.len(), 2);
    assert_eq!(
        decl.vars.get("RUST_LOG").map(|v| v.render()),
        Some("debug".to_string())
    );
}

#[test]
fn bare_mapping_without_vars_key_is_rejected() {
    // Only the structured {vars, include} shape exists; inline pairs must
    // go under vars:.
    assert!(serde_yaml::from_str::<EnvDecl>("{RUST_LOG: debug}").is_err());
}

#[test]
fn vars_named_vars_and_include_stay_inside_the_vars_mapping() {
    // Env vars literally called `vars`/`include` are declared under vars:
    // like any other key and round-trip without ambiguity.
    let decl: EnvDecl =
        serde_yaml::from_str("{vars: {vars: '1', include: '2'}}").unwrap();
    assert_eq!(decl.vars.get("vars").map(|v| v.render()), Some("1".to_string()));
    assert_eq!(
        decl.vars.get("include").map(|v| v.render()),
        Some("2".to_string())
    );
}

#[test]
fn env_values_keep_non_string_shapes() {
    let decl: EnvDecl = serde_yaml::from_str("{vars: {COUNT: 3}}").unwrap();
    assert_eq!(
        decl.vars.get("COUNT"),
        Some(&atkins_core::Value::Int(3))
    );
}
