// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline execution entry point

use crate::board::CompletionBoard;
use crate::error::EngineError;
use crate::event_log::{Logger, Summary};
use crate::job::run_job;
use crate::metadata::capture_metadata;
use crate::vars::{apply_env_decl, merge_variables};
use atkins_core::{ExecEvent, ExecResult, Scope, Status};
use atkins_expr::Interpolator;
use atkins_pipeline::{display_order, lint, resolve_order, Job, Pipeline};
use atkins_shell::ShellRunner;
use atkins_tree::{color, render, Display, Node, NodeSnapshot};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Options forwarded from the front end.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Run only this job and its dependencies.
    pub job: Option<String>,
    /// Event log output path; no log file when absent.
    pub log_file: Option<PathBuf>,
    /// Source file path, forwarded to log metadata.
    pub pipeline_file: Option<PathBuf>,
    /// Record the scheduler thread on each event.
    pub debug: bool,
    /// Suppress live redraw; emit only the final static tree.
    pub final_only: bool,
    /// Job timeout when a job declares none.
    pub default_timeout: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            job: None,
            log_file: None,
            pipeline_file: None,
            debug: false,
            final_only: false,
            default_timeout: Duration::from_secs(300),
        }
    }
}

/// Outcome of a finished pipeline run.
#[derive(Debug)]
pub struct RunReport {
    pub result: ExecResult,
    /// 0 on success, else the last non-zero command exit code (1 fallback).
    pub exit_code: i32,
    pub summary: Summary,
    pub events: Vec<ExecEvent>,
    pub tree: NodeSnapshot,
    /// First failure message, when the run failed.
    pub error: Option<String>,
    /// Captured output of the first failing command.
    pub error_output: Option<String>,
}

/// Shared state for one pipeline run.
pub(crate) struct RunCtx {
    pub pipeline: Pipeline,
    pub shell: Arc<dyn ShellRunner>,
    pub display: Display,
    pub logger: Logger,
    pub root: Arc<Node>,
    pub board: CompletionBoard,
    pub options: PipelineOptions,
    pub colorize: bool,
    pub base_dir: PathBuf,
    last_exit: AtomicI32,
}

impl RunCtx {
    /// Re-render the tree over the previous frame.
    pub fn redraw(&self) {
        let frame = render(&self.root.snapshot(), self.colorize);
        self.display.redraw(&frame);
    }

    pub fn elapsed(&self) -> f64 {
        self.logger.elapsed()
    }

    pub fn record_exit(&self, code: i32) {
        if code != 0 {
            self.last_exit.store(code, Ordering::SeqCst);
        }
    }
}

/// Runs pipelines against a shell seam.
pub struct Executor {
    shell: Arc<dyn ShellRunner>,
    options: PipelineOptions,
}

impl Executor {
    pub fn new(shell: Arc<dyn ShellRunner>, options: PipelineOptions) -> Self {
        Self { shell, options }
    }

    /// Lint, resolve, and run the whole pipeline; write the event log and
    /// emit the final tree on the way out.
    ///
    /// Job failures do not abort the run — remaining jobs still execute and
    /// the report carries the first failure plus the last non-zero exit
    /// code. Only lint/resolve/variable errors return `Err` here.
    pub async fn execute_pipeline(&self, pipeline: &Pipeline) -> Result<RunReport, EngineError> {
        lint(pipeline)?;
        let order = resolve_order(pipeline, self.options.job.as_deref())?;
        tracing::info!(pipeline = %pipeline.name, jobs = order.len(), "starting pipeline");

        let base_dir = self
            .options
            .pipeline_file
            .as_deref()
            .and_then(|p| p.parent().map(PathBuf::from))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();

        // The OS environment is captured once; everything downstream sees
        // overlays of this snapshot.
        let env: IndexMap<String, String> = std::env::vars().collect();
        let mut scope = Scope::with_env(env);

        let interp = Interpolator::new(self.shell.as_ref());
        if let Some(env_decl) = &pipeline.env {
            scope = apply_env_decl(env_decl, &scope, &interp, &base_dir).await?;
        }
        let mut scope = scope.overlay(IndexMap::new());
        merge_variables(&pipeline.vars, &mut scope, &interp).await?;

        let root = Node::new(
            if pipeline.name.is_empty() {
                "pipeline"
            } else {
                &pipeline.name
            },
            "pipeline",
        );

        // Pre-populate the static plan: every resolved job and its declared
        // steps, visible jobs attached to the root in display order.
        let mut job_nodes: HashMap<String, (Arc<Node>, Vec<Arc<Node>>)> = HashMap::new();
        for name in &order {
            if let Some(job) = pipeline.jobs.get(name) {
                job_nodes.insert(name.clone(), build_job_node(job));
            }
        }
        let mut shown: Vec<String> = order
            .iter()
            .filter(|n| pipeline.jobs.get(*n).is_some_and(Job::visible))
            .cloned()
            .collect();
        display_order(&mut shown);
        for name in &shown {
            if let Some((node, _)) = job_nodes.get(name) {
                root.add_child(node.clone());
            }
        }

        let ctx = Arc::new(RunCtx {
            pipeline: pipeline.clone(),
            shell: self.shell.clone(),
            display: Display::stdout(self.options.final_only),
            logger: Logger::new(self.options.log_file.clone(), self.options.debug),
            root,
            board: CompletionBoard::new(),
            options: self.options.clone(),
            colorize: color::should_colorize(),
            base_dir,
            last_exit: AtomicI32::new(0),
        });
        ctx.redraw();

        let metadata = capture_metadata(
            self.shell.as_ref(),
            scope.env(),
            &pipeline.name,
            self.options.pipeline_file.as_deref(),
        )
        .await;

        // Detached jobs spawn up front; the rest run sequentially in
        // resolved order. Dependency waits happen inside each job.
        let mut detached: JoinSet<(String, Result<(), EngineError>)> = JoinSet::new();
        let mut failures: Vec<(String, EngineError)> = Vec::new();

        for name in &order {
            let Some(job) = pipeline.jobs.get(name) else {
                continue;
            };
            if !job.detach {
                continue;
            }
            let Some((node, step_nodes)) = job_nodes.get(name).cloned() else {
                continue;
            };
            let ctx = ctx.clone();
            let job = job.clone();
            let scope = scope.clone();
            let name = name.clone();
            detached.spawn(async move {
                let result = run_job(ctx, job, node, step_nodes, scope, true).await;
                (name, result)
            });
        }

        for name in &order {
            let Some(job) = pipeline.jobs.get(name) else {
                continue;
            };
            if job.detach {
                continue;
            }
            let Some((node, step_nodes)) = job_nodes.get(name).cloned() else {
                continue;
            };
            if let Err(err) =
                run_job(ctx.clone(), job.clone(), node, step_nodes, scope.clone(), true).await
            {
                tracing::warn!(job = %name, error = %err, "job failed");
                failures.push((name.clone(), err));
            }
        }

        while let Some(joined) = detached.join_next().await {
            if let Ok((name, Err(err))) = joined {
                tracing::warn!(job = %name, error = %err, "detached job failed");
                failures.push((name, err));
            }
        }

        let result = if failures.is_empty() {
            ExecResult::Pass
        } else {
            ExecResult::Fail
        };
        ctx.root.set_status(match result {
            ExecResult::Pass => Status::Passed,
            _ => Status::Failed,
        });
        ctx.root.set_duration(ctx.elapsed());

        let summary = ctx.logger.summarize(result);
        let tree = ctx.root.snapshot();
        ctx.display.finish(&render(&tree, ctx.colorize));
        ctx.logger.write(&metadata, &tree, &summary)?;

        let exit_code = match result {
            ExecResult::Pass => 0,
            _ => {
                let last = ctx.last_exit.load(Ordering::SeqCst);
                if last != 0 {
                    last
                } else {
                    1
                }
            }
        };

        Ok(RunReport {
            result,
            exit_code,
            summary,
            events: ctx.logger.events(),
            tree,
            error: failures.first().map(|(name, err)| format!("{}: {}", name, err)),
            error_output: failures
                .first()
                .and_then(|(_, err)| err.output().map(str::to_string)),
        })
    }
}

/// Build a job's subtree: the job node plus one child per declared step,
/// and one leaf per command for `cmds:` steps.
pub(crate) fn build_job_node(job: &Job) -> (Arc<Node>, Vec<Arc<Node>>) {
    let node = Node::new(&job.name, format!("jobs.{}", job.name));
    node.set_depends_on(job.depends_on.0.clone());
    node.set_summarize(job.summarize);

    let mut step_nodes = Vec::with_capacity(job.steps.len());
    for (index, step) in job.steps.iter().enumerate() {
        let step_node = Node::new(step.label(), format!("jobs.{}.steps.{}", job.name, index));
        if step.condition.is_some() {
            step_node.set_status(Status::Conditional);
        }
        step_node.set_deferred(step.deferred);
        step_node.set_summarize(step.summarize);
        step_node.set_passthru(step.passthru || step.verbose);
        for (ci, command) in step.cmds.iter().enumerate() {
            step_node.add_child(Node::new(
                command,
                format!("jobs.{}.steps.{}.cmds.{}", job.name, index, ci),
            ));
        }
        node.add_child(step_node.clone());
        step_nodes.push(step_node);
    }

    (node, step_nodes)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
