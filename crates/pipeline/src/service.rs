// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service declarations
//!
//! `services:` blocks are part of the document model so existing pipeline
//! files parse, but the runner never orchestrates them. The executor logs a
//! no-op note per declared service; a future orchestrator can attach here
//! without reshaping the model.

use atkins_core::Value;
use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub env: IndexMap<String, Value>,
    #[serde(default)]
    pub ports: Vec<String>,
    /// Fields beyond the common ones are carried opaquely.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}
