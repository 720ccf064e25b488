// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `KEY=VALUE` environment include files

use crate::error::LoadError;
use indexmap::IndexMap;
use std::path::Path;

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped;
/// values may be single- or double-quoted. Lines without `=` are ignored.
pub fn parse_env_file(content: &str) -> IndexMap<String, String> {
    let mut vars = IndexMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    vars
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

/// Load each include file relative to `base_dir`, later files overriding
/// earlier ones key-by-key.
pub fn load_env_includes(
    paths: &[String],
    base_dir: &Path,
) -> Result<IndexMap<String, String>, LoadError> {
    let mut merged = IndexMap::new();
    for path in paths {
        let full = base_dir.join(path);
        let content = std::fs::read_to_string(&full).map_err(|source| LoadError::Io {
            path: full.clone(),
            source,
        })?;
        for (k, v) in parse_env_file(&content) {
            merged.insert(k, v);
        }
    }
    Ok(merged)
}

#[cfg(test)]
#[path = "envfile_tests.rs"]
mod tests;
