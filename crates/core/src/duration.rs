// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration parsing for `timeout:` fields and elapsed-time formatting

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration string")]
    Empty,
    #[error("invalid number in duration: {0}")]
    InvalidNumber(String),
    #[error("unknown duration suffix: {0}")]
    UnknownSuffix(String),
}

/// Parse a duration string like `"300s"`, `"10m"`, `"1h"`, `"500ms"`.
///
/// A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationError::Empty);
    }

    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str
        .parse()
        .map_err(|_| DurationError::InvalidNumber(s.to_string()))?;

    match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => Ok(Duration::from_millis(num)),
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(num)),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(Duration::from_secs(num * 60)),
        "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Duration::from_secs(num * 3600)),
        "d" | "day" | "days" => Ok(Duration::from_secs(num * 86400)),
        other => Err(DurationError::UnknownSuffix(other.to_string())),
    }
}

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`.
///
/// For the hours range, minutes are included when non-zero.
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let m = secs / 60;
        let s = secs % 60;
        if s > 0 {
            format!("{}m{}s", m, s)
        } else {
            format!("{}m", m)
        }
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
