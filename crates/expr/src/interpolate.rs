// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${{ expr }}` and `$(shell)` interpolation
//!
//! Command substitution runs first on the outer string, with each body's
//! `${{...}}` references expanded before the shell sees it, so variable
//! references survive into the shell call. Nested `$(...)` inside a body is
//! left for the shell's own substitution; the scanner here only needs to
//! find the matching close paren without being fooled by quoted text.

use crate::error::ExprError;
use crate::eval::eval_str;
use atkins_core::Scope;
use atkins_shell::{ShellError, ShellRunner};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Regex for `${{ expr }}` occurrences.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static EXPR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$\{\{(.*?)\}\}").expect("constant regex pattern is valid")
});

#[derive(Debug, Error)]
pub enum InterpolateError {
    /// A `$(...)` body exited non-zero. Expression errors never surface
    /// here; they keep their literal text instead.
    #[error("command substitution failed (exit {exit_code}): {command}")]
    Shell {
        command: String,
        output: String,
        exit_code: i32,
    },
    #[error(transparent)]
    Launch(#[from] ShellError),
}

/// Expands `${{ expr }}` and `$(shell)` in command and condition strings.
pub struct Interpolator<'a> {
    shell: &'a dyn ShellRunner,
}

impl<'a> Interpolator<'a> {
    pub fn new(shell: &'a dyn ShellRunner) -> Self {
        Self { shell }
    }

    /// Substitute every `$(shell)` and `${{ expr }}` occurrence in `input`.
    ///
    /// Inputs containing neither form come back unchanged. Expression
    /// failures keep their original literal; shell failures propagate.
    pub async fn interpolate(&self, input: &str, scope: &Scope) -> Result<String, InterpolateError> {
        let expanded = self.expand_substitutions(input, scope).await?;
        Ok(expand_expressions(&expanded, scope))
    }

    async fn expand_substitutions(
        &self,
        input: &str,
        scope: &Scope,
    ) -> Result<String, InterpolateError> {
        if !input.contains("$(") {
            return Ok(input.to_string());
        }

        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '$' && chars.get(i + 1) == Some(&'(') {
                if let Some(close) = find_matching_paren(&chars, i + 2) {
                    let body: String = chars[i + 2..close].iter().collect();
                    let command = expand_expressions(&body, scope);
                    let output = self.shell.run(&command, scope.env(), false).await?;
                    if output.exit_code != 0 {
                        let detail = if output.stderr.is_empty() {
                            output.stdout
                        } else {
                            output.stderr
                        };
                        return Err(InterpolateError::Shell {
                            command,
                            output: detail,
                            exit_code: output.exit_code,
                        });
                    }
                    out.push_str(output.stdout.trim());
                    i = close + 1;
                    continue;
                }
            }
            out.push(chars[i]);
            i += 1;
        }

        Ok(out)
    }
}

/// Locate the `)` matching an already-consumed `$(`, starting at `start`.
///
/// Tracks paren depth while skipping single- and double-quoted spans;
/// backslash escapes the next character outside single quotes, so escaped
/// quotes do not end a span.
fn find_matching_paren(chars: &[char], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut in_single = false;
    let mut in_double = false;
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        if in_single {
            if c == '\'' {
                in_single = false;
            }
        } else if in_double {
            match c {
                '\\' => i += 1,
                '"' => in_double = false,
                _ => {}
            }
        } else {
            match c {
                '\\' => i += 1,
                '\'' => in_single = true,
                '"' => in_double = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        i += 1;
    }

    None
}

/// Replace each `${{ expr }}` with its evaluated value.
///
/// Compile errors, evaluation errors, and null results keep the original
/// literal so a half-written pipeline still renders something useful.
fn expand_expressions(input: &str, scope: &Scope) -> String {
    EXPR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let src = caps[1].trim();
            match eval_str(src, scope, true) {
                Ok(value) if !value.is_null() => value.render(),
                Ok(_) => caps[0].to_string(),
                Err(err) => {
                    if !matches!(err, ExprError::Undefined(_)) {
                        tracing::debug!(expr = src, error = %err, "expression kept as literal");
                    }
                    caps[0].to_string()
                }
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "interpolate_tests.rs"]
mod tests;
