// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-level execution: dependency waits, variable merging, the three step
//! phases (sequential, detached, deferred), and job events.

use crate::error::EngineError;
use crate::executor::RunCtx;
use crate::step::run_step;
use crate::vars::{apply_env_decl, merge_variables};
use atkins_core::{parse_duration, ExecResult, Scope, Status};
use atkins_expr::{eval_condition, Interpolator};
use atkins_pipeline::{Job, Step};
use atkins_tree::Node;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Per-job execution handle shared by every step of one job run.
#[derive(Clone)]
pub(crate) struct JobRun {
    pub ctx: Arc<RunCtx>,
    pub job_name: String,
    /// Monotonic exec counter for `jobs.<name>.steps.<n>` event ids.
    counter: Arc<AtomicUsize>,
    pub deadline: Instant,
    /// The job's timeout window, reused fresh for the deferred phase.
    pub window: Duration,
}

impl JobRun {
    /// Append a step-level event, consuming the next monotonic index.
    pub fn log_step(
        &self,
        result: ExecResult,
        run: &str,
        start: f64,
        duration: f64,
        error: Option<String>,
    ) {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        let id = format!("jobs.{}.steps.{}", self.job_name, index);
        self.ctx
            .logger
            .log_exec(result, &id, run, start, duration, error);
    }

    /// Time left before the job deadline fires.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.checked_duration_since(Instant::now())
    }
}

enum JobEnd {
    Passed,
    Skipped,
}

/// Execute one job: wait for dependencies, merge its variable scope, run
/// its steps, then record status, event, and completion signal.
///
/// `top_level` jobs participate in the completion board; task-invoked jobs
/// do not (their lifetime is their caller's step).
pub(crate) async fn run_job(
    ctx: Arc<RunCtx>,
    job: Job,
    node: Arc<Node>,
    step_nodes: Vec<Arc<Node>>,
    scope: Scope,
    top_level: bool,
) -> Result<(), EngineError> {
    if top_level && !job.depends_on.is_empty() {
        tracing::debug!(job = %job.name, deps = ?job.depends_on.0, "waiting for dependencies");
        ctx.board.wait_for(&job.depends_on.0).await;
    }

    for service in job.services.keys() {
        // Parsed for forward compatibility; orchestration is a no-op.
        tracing::info!(job = %job.name, %service, "service declared, not orchestrated");
    }

    let start = ctx.elapsed();
    node.set_start(start);

    let outcome = run_job_inner(&ctx, &job, &node, &step_nodes, scope).await;
    let duration = ctx.elapsed() - start;
    node.set_duration(duration);

    let (status, result, error) = match &outcome {
        Ok(JobEnd::Passed) => (Status::Passed, ExecResult::Pass, None),
        Ok(JobEnd::Skipped) => (Status::Skipped, ExecResult::Skipped, None),
        Err(err) => (Status::Failed, ExecResult::Fail, Some(err.to_string())),
    };
    node.set_status(status);
    if status == Status::Failed {
        // Steps the failure never reached are not going to run.
        mark_unreached_skipped(&step_nodes);
    }

    ctx.logger.log_exec(
        result,
        &format!("jobs.{}", job.name),
        &job.name,
        start,
        duration,
        error,
    );
    if top_level {
        ctx.board.complete(&job.name, result == ExecResult::Pass);
    }
    ctx.redraw();

    outcome.map(|_| ())
}

async fn run_job_inner(
    ctx: &Arc<RunCtx>,
    job: &Job,
    node: &Arc<Node>,
    step_nodes: &[Arc<Node>],
    scope: Scope,
) -> Result<JobEnd, EngineError> {
    let interp = Interpolator::new(ctx.shell.as_ref());

    // Merge order: pipeline scope (already in `scope`), job env, job vars.
    let mut scope = match &job.env {
        Some(env) => apply_env_decl(env, &scope, &interp, &ctx.base_dir).await?,
        None => scope,
    };
    let mut merged = scope.overlay(IndexMap::new());
    merge_variables(&job.vars, &mut merged, &interp).await?;
    scope = merged;

    if let Some(condition) = &job.condition {
        let pass = eval_condition(condition, &scope).map_err(|e| EngineError::Condition {
            condition: condition.clone(),
            message: e.to_string(),
        })?;
        if !pass {
            for step_node in step_nodes {
                step_node.set_status(Status::Skipped);
            }
            return Ok(JobEnd::Skipped);
        }
    }

    let window = match &job.timeout {
        Some(text) => parse_duration(text).map_err(|e| EngineError::Condition {
            condition: format!("timeout: {}", text),
            message: e.to_string(),
        })?,
        None => ctx.options.default_timeout,
    };

    node.set_status(Status::Running);
    ctx.redraw();

    let run = JobRun {
        ctx: ctx.clone(),
        job_name: job.name.clone(),
        counter: Arc::new(AtomicUsize::new(0)),
        deadline: Instant::now() + window,
        window,
    };
    run_steps(&run, &job.steps, step_nodes, &scope).await?;
    Ok(JobEnd::Passed)
}

/// Drive a job's steps through the three phases.
///
/// Deferred steps are held back and popped LIFO after the main and
/// detached phases, success or failure. The first non-deferred failure
/// wins; deferred failures are logged and only surface when nothing else
/// failed. A main-phase failure aborts still-running detached siblings.
async fn run_steps(
    run: &JobRun,
    steps: &[Step],
    nodes: &[Arc<Node>],
    scope: &Scope,
) -> Result<(), EngineError> {
    let mut deferred: Vec<(Step, Arc<Node>)> = Vec::new();
    let mut detached: JoinSet<Result<(), EngineError>> = JoinSet::new();
    let mut first_err: Option<EngineError> = None;

    for (step, node) in steps.iter().zip(nodes) {
        if step.deferred {
            deferred.push((step.clone(), node.clone()));
            continue;
        }
        if step.detach {
            let run = run.clone();
            let step = step.clone();
            let node = node.clone();
            let scope = scope.clone();
            detached.spawn(async move { run_step(&run, &step, &node, &scope).await });
            continue;
        }
        if let Err(err) = run_step(run, step, node, scope).await {
            first_err = Some(err);
            break;
        }
    }

    if first_err.is_some() {
        detached.abort_all();
    }
    while let Some(joined) = detached.join_next().await {
        if let Ok(Err(err)) = joined {
            if first_err.is_none() {
                first_err = Some(err);
            }
        }
    }

    if !deferred.is_empty() {
        // Cleanup must still run after a deadline fires, so the deferred
        // phase gets its own window of the same size.
        let deferred_run = JobRun {
            deadline: Instant::now() + run.window,
            ..run.clone()
        };
        for (step, node) in deferred.iter().rev() {
            if let Err(err) = run_step(&deferred_run, step, node, scope).await {
                tracing::warn!(
                    job = %run.job_name,
                    step = %node.id(),
                    error = %err,
                    "deferred step failed"
                );
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn mark_unreached_skipped(step_nodes: &[Arc<Node>]) {
    // By the time a job is terminal no step is still executing: anything
    // non-terminal was never reached or was aborted mid-flight.
    for node in step_nodes {
        if !node.status().is_terminal() {
            node.set_status(Status::Skipped);
        }
    }
}
