// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment declarations and dependency lists
//!
//! Both `depends_on:` and `include:` accept scalar-or-sequence shorthands,
//! normalized at decode time so callers always see a list.

use atkins_core::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// A `depends_on:` list. A bare string is a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum DependenciesRaw {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for Dependencies {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = DependenciesRaw::deserialize(d)?;
        Ok(match raw {
            DependenciesRaw::One(name) => Dependencies(vec![name]),
            DependenciesRaw::Many(names) => Dependencies(names),
        })
    }
}

impl Dependencies {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// An `env:` declaration: included `KEY=VALUE` files plus inline vars.
///
/// The shape is exactly `{vars: mapping, include: string | sequence}`.
/// Included files load first; `vars` overrides any imported key. Keys
/// other than `vars`/`include` are a load error, so a mistyped declaration
/// fails loudly instead of being silently ignored.
#[derive(Debug, Clone, Default)]
pub struct EnvDecl {
    pub vars: IndexMap<String, Value>,
    pub include: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EnvDeclStructured {
    #[serde(default)]
    vars: IndexMap<String, Value>,
    #[serde(default)]
    include: Option<EnvIncludeRaw>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnvIncludeRaw {
    One(String),
    Many(Vec<String>),
}

impl EnvIncludeRaw {
    fn into_vec(self) -> Vec<String> {
        match self {
            EnvIncludeRaw::One(path) => vec![path],
            EnvIncludeRaw::Many(paths) => paths,
        }
    }
}

impl<'de> Deserialize<'de> for EnvDecl {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let decl = EnvDeclStructured::deserialize(d)?;
        Ok(EnvDecl {
            vars: decl.vars,
            include: decl.include.map(EnvIncludeRaw::into_vec).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "envdecl_tests.rs"]
mod tests;
