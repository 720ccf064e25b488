// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static tree rendering

use crate::color;
use crate::node::NodeSnapshot;
use atkins_core::Status;
use std::fmt::Write;

/// Render a snapshot as a UTF-8 box-drawing tree, one line per node.
///
/// Summarized nodes render `label status (k/n)` and suppress their
/// children. Pending deferred steps carry a `(deferred)` tag, jobs with
/// dependencies a `depends_on:` annotation, and passthru output lines are
/// indented beneath their node.
pub fn render(root: &NodeSnapshot, colorize: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", node_line(root, colorize));
    render_children(root, "", colorize, &mut out);
    out
}

fn render_children(node: &NodeSnapshot, prefix: &str, colorize: bool, out: &mut String) {
    if node.summarize {
        return;
    }
    let count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        let last = index + 1 == count;
        let branch = if last { "└─ " } else { "├─ " };
        let _ = writeln!(out, "{}{}{}", prefix, branch, node_line(child, colorize));

        let continuation = if last { "   " } else { "│  " };
        let child_prefix = format!("{}{}", prefix, continuation);

        if !child.output.is_empty() {
            for line in &child.output {
                let _ = writeln!(out, "{}  {}", child_prefix, line);
            }
        }
        render_children(child, &child_prefix, colorize, out);
    }
}

fn node_line(node: &NodeSnapshot, colorize: bool) -> String {
    let glyph = color::status(node.status, node.status.glyph(), colorize);
    let mut line = format!("{} {}", glyph, node.name);

    if node.summarize {
        let (passed, total) = node.progress();
        let _ = write!(
            line,
            " {} ({}/{})",
            color::status(node.status, node.status.label(), colorize),
            passed,
            total
        );
        return line;
    }

    if node.deferred && node.status == Status::Pending {
        line.push_str(" (deferred)");
    }
    if !node.depends_on.is_empty() {
        let _ = write!(line, " depends_on: {}", node.depends_on.join(", "));
    }
    if let Some(duration) = node.duration {
        if node.status.is_terminal() && node.status != Status::Skipped {
            let _ = write!(line, " ({:.1}s)", duration);
        }
    }
    line
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
