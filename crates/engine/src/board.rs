// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job completion signalling for `depends_on` waits

use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::Notify;

/// Shared map of jobs that reached a terminal state.
///
/// Waiters park on a [`Notify`] and re-check after every completion, so a
/// dependent job's first step never starts before every listed dependency
/// has finished. Completion is about terminality, not success; a dependent
/// observes a failed dependency's outcome and still proceeds.
#[derive(Default)]
pub(crate) struct CompletionBoard {
    done: Mutex<HashMap<String, bool>>,
    notify: Notify,
}

impl CompletionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a job terminal. Wakes every waiter for a re-check.
    pub fn complete(&self, name: &str, passed: bool) {
        self.done.lock().insert(name.to_string(), passed);
        self.notify.notify_waiters();
    }

    /// Block until every named job is terminal.
    pub async fn wait_for(&self, names: &[String]) {
        loop {
            // Arm the wakeup before checking so a completion between the
            // check and the await is not lost.
            let notified = self.notify.notified();
            {
                let done = self.done.lock();
                if names.iter().all(|n| done.contains_key(n)) {
                    return;
                }
            }
            notified.await;
        }
    }

    /// Whether a completed job passed. `None` until it completes.
    pub fn outcome(&self, name: &str) -> Option<bool> {
        self.done.lock().get(name).copied()
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
