// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-annotated execution tree

use atkins_core::Status;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// One node in the execution tree: the pipeline root, a job, a step, a loop
/// iteration, or a single command of a `cmds:` list.
///
/// Mutators take the node's own mutex; readers copy state out via
/// [`Node::snapshot`] and never hold a lock across rendering. Parent links
/// are not kept — redraw always walks from the root.
pub struct Node {
    name: String,
    id: String,
    state: Mutex<NodeState>,
}

struct NodeState {
    status: Status,
    created: Instant,
    updated: Instant,
    /// Seconds from pipeline start, once execution begins.
    start: Option<f64>,
    duration: Option<f64>,
    children: Vec<Arc<Node>>,
    depends_on: Vec<String>,
    deferred: bool,
    summarize: bool,
    passthru: bool,
    output: Vec<String>,
}

/// Point-in-time copy of a node and its subtree, used for rendering and the
/// serialized event log.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeSnapshot {
    pub name: String,
    pub id: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deferred: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub summarize: bool,
    #[serde(skip)]
    pub passthru: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl Node {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Arc<Node> {
        let now = Instant::now();
        Arc::new(Node {
            name: name.into(),
            id: id.into(),
            state: Mutex::new(NodeState {
                status: Status::Pending,
                created: now,
                updated: now,
                start: None,
                duration: None,
                children: Vec::new(),
                depends_on: Vec::new(),
                deferred: false,
                summarize: false,
                passthru: false,
                output: Vec::new(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_child(&self, child: Arc<Node>) {
        self.state.lock().children.push(child);
    }

    pub fn status(&self) -> Status {
        self.state.lock().status
    }

    pub fn set_status(&self, status: Status) {
        let mut state = self.state.lock();
        state.status = status;
        state.updated = Instant::now();
    }

    pub fn set_start(&self, offset_secs: f64) {
        let mut state = self.state.lock();
        state.start = Some(offset_secs);
        state.updated = Instant::now();
    }

    pub fn set_duration(&self, secs: f64) {
        let mut state = self.state.lock();
        state.duration = Some(secs);
        state.updated = Instant::now();
    }

    pub fn set_depends_on(&self, deps: Vec<String>) {
        self.state.lock().depends_on = deps;
    }

    pub fn set_deferred(&self, deferred: bool) {
        self.state.lock().deferred = deferred;
    }

    pub fn set_summarize(&self, summarize: bool) {
        self.state.lock().summarize = summarize;
    }

    pub fn set_passthru(&self, passthru: bool) {
        self.state.lock().passthru = passthru;
    }

    /// Replace the captured output attached beneath this node.
    pub fn set_output(&self, lines: Vec<String>) {
        let mut state = self.state.lock();
        state.output = lines;
        state.updated = Instant::now();
    }

    /// Copy of the current child list.
    pub fn children(&self) -> Vec<Arc<Node>> {
        self.state.lock().children.clone()
    }

    /// Age of the node since creation, in seconds.
    pub fn age_secs(&self) -> f64 {
        let state = self.state.lock();
        state.created.elapsed().as_secs_f64()
    }

    /// Seconds since the last state change.
    pub fn idle_secs(&self) -> f64 {
        let state = self.state.lock();
        state.updated.elapsed().as_secs_f64()
    }

    /// Copy this node and its subtree. Each node's lock is held only long
    /// enough to copy its own fields and child list.
    pub fn snapshot(&self) -> NodeSnapshot {
        let (mut snap, children) = {
            let state = self.state.lock();
            (
                NodeSnapshot {
                    name: self.name.clone(),
                    id: self.id.clone(),
                    status: state.status,
                    start: state.start,
                    duration: state.duration,
                    depends_on: state.depends_on.clone(),
                    deferred: state.deferred,
                    summarize: state.summarize,
                    passthru: state.passthru,
                    output: state.output.clone(),
                    children: Vec::new(),
                },
                state.children.clone(),
            )
        };
        snap.children = children.iter().map(|c| c.snapshot()).collect();
        snap
    }
}

impl NodeSnapshot {
    /// Passed descendants over total, for `k/n` summaries.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.children.len();
        let passed = self
            .children
            .iter()
            .filter(|c| c.status == Status::Passed)
            .count();
        (passed, total)
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
