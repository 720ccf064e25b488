// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ANSI color helpers for tree rendering

use atkins_core::Status;
use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Apply green (ANSI 32) to text.
pub fn green(text: &str) -> String {
    format!("\x1b[32m{text}{RESET}")
}

/// Apply red (ANSI 31) to text.
pub fn red(text: &str) -> String {
    format!("\x1b[31m{text}{RESET}")
}

/// Apply yellow (ANSI 33) to text.
pub fn yellow(text: &str) -> String {
    format!("\x1b[33m{text}{RESET}")
}

/// Apply cyan (ANSI 36) to text.
pub fn cyan(text: &str) -> String {
    format!("\x1b[36m{text}{RESET}")
}

/// Muted / secondary text: darker grey.
pub fn muted(text: &str) -> String {
    format!("\x1b[38;5;240m{text}{RESET}")
}

/// Color a status glyph or label by its semantic meaning.
pub fn status(status: Status, text: &str, colorize: bool) -> String {
    if !colorize {
        return text.to_string();
    }
    match status {
        Status::Passed => green(text),
        Status::Failed => red(text),
        Status::Running => yellow(text),
        Status::Skipped => muted(text),
        Status::Conditional => cyan(text),
        Status::Pending => muted(text),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
