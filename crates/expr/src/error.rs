// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors for expression compilation and evaluation

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("unterminated string literal starting at position {pos}")]
    UnterminatedString { pos: usize },
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("undefined variable: {0}")]
    Undefined(String),
    #[error("cannot access field '{field}' on {kind} value")]
    BadAccess { field: String, kind: &'static str },
    #[error("cannot compare {left} with {right}")]
    BadComparison { left: &'static str, right: &'static str },
}
