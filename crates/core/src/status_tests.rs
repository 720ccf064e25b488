// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn labels_are_lowercase_words() {
    assert_eq!(Status::Pending.label(), "pending");
    assert_eq!(Status::Conditional.label(), "conditional");
    assert_eq!(Status::Passed.to_string(), "passed");
}

#[test]
fn terminal_states() {
    assert!(Status::Passed.is_terminal());
    assert!(Status::Failed.is_terminal());
    assert!(Status::Skipped.is_terminal());
    assert!(!Status::Pending.is_terminal());
    assert!(!Status::Running.is_terminal());
    assert!(!Status::Conditional.is_terminal());
}

#[test]
fn serializes_as_label() {
    let s = serde_yaml::to_string(&Status::Failed).unwrap();
    assert_eq!(s.trim(), "failed");
}
