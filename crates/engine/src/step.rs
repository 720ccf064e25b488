// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step semantics: conditions, loop expansion, task invocation, and
//! command execution with output capture.

use crate::error::EngineError;
use crate::executor::build_job_node;
use crate::forloop::expand_loop;
use crate::job::{run_job, JobRun};
use crate::vars::apply_env_decl;
use atkins_core::{ExecResult, Scope, Status};
use atkins_expr::{eval_condition, Interpolator};
use atkins_pipeline::{validate_job_requirements, Step};
use atkins_tree::{sanitize_output, Node};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed step/job future. Loop bodies and task invocations re-enter the
/// step machinery, so the recursive edges are type-erased.
type ExecFuture<'a> = Pin<Box<dyn Future<Output = Result<(), EngineError>> + Send + 'a>>;

/// What this step would run, for event `run` fields and labels.
fn run_text(step: &Step) -> String {
    if let Some(run) = &step.run {
        return run.clone();
    }
    if !step.cmds.is_empty() {
        return step.cmds.join(" && ");
    }
    if let Some(task) = &step.task {
        return format!("task: {}", task);
    }
    if let Some(uses) = &step.uses {
        return format!("uses: {}", uses);
    }
    String::new()
}

/// Execute one step under its parent scope. Dispatches `if:` guards,
/// `for:` expansion, `task:` invocation, and plain commands.
///
/// Returns a boxed future: loop bodies and task invocations re-enter this
/// function, and the recursive edge must be type-erased.
pub(crate) fn run_step<'a>(
    run: &'a JobRun,
    step: &'a Step,
    node: &'a Arc<Node>,
    scope: &'a Scope,
) -> ExecFuture<'a> {
    Box::pin(run_step_inner(run, step, node, scope))
}

async fn run_step_inner(
    run: &JobRun,
    step: &Step,
    node: &Arc<Node>,
    scope: &Scope,
) -> Result<(), EngineError> {
    let interp = Interpolator::new(run.ctx.shell.as_ref());
    let scope = match &step.env {
        Some(env) => apply_env_decl(env, scope, &interp, &run.ctx.base_dir).await?,
        None => scope.clone(),
    };

    if let Some(condition) = &step.condition {
        match eval_condition(condition, &scope) {
            Ok(true) => {}
            Ok(false) => {
                node.set_status(Status::Skipped);
                run.log_step(ExecResult::Skipped, &run_text(step), run.ctx.elapsed(), 0.0, None);
                run.ctx.redraw();
                return Ok(());
            }
            Err(err) => {
                let err = EngineError::Condition {
                    condition: condition.clone(),
                    message: err.to_string(),
                };
                return Err(fail_step(run, step, node, err, run.ctx.elapsed()));
            }
        }
    }

    if let Some(header) = &step.for_each {
        return run_loop_step(run, step, node, &scope, header).await;
    }

    if let Some(task) = &step.task {
        return run_task_step(run, step, node, &scope, task).await;
    }

    if step.run.is_none() && step.cmds.is_empty() {
        if let Some(uses) = &step.uses {
            // `uses:` references are carried opaquely; acknowledge and move on.
            tracing::info!(%uses, "uses step has no handler, passing through");
            let start = run.ctx.elapsed();
            node.set_status(Status::Passed);
            run.log_step(ExecResult::Pass, &run_text(step), start, 0.0, None);
            run.ctx.redraw();
        }
        return Ok(());
    }

    run_command_step(run, step, node, &scope).await
}

/// Expand a `for:` header and run the body once per iteration under its
/// overlay. Every iteration is attempted; the step fails if any iteration
/// failed, propagating the last error.
async fn run_loop_step(
    run: &JobRun,
    step: &Step,
    node: &Arc<Node>,
    scope: &Scope,
    header: &str,
) -> Result<(), EngineError> {
    let start = run.ctx.elapsed();
    let iterations = match expand_loop(header, scope, run.ctx.shell.as_ref()).await {
        Ok(iterations) => iterations,
        Err(err) => return Err(fail_step(run, step, node, err, start)),
    };

    node.set_status(Status::Running);
    node.set_start(start);
    run.ctx.redraw();

    // The guard and env overlay were already applied to `scope`; the body
    // re-enters run_step with only the per-iteration work left.
    let mut body = step.clone();
    body.for_each = None;
    body.condition = None;
    body.env = None;

    let mut last_err = None;
    for iteration in iterations {
        let child = Node::new(
            format!("[{}]", iteration.label),
            format!("{}[{}]", node.id(), iteration.label),
        );
        child.set_passthru(step.passthru || step.verbose);
        node.add_child(child.clone());

        let iter_scope = scope.overlay(iteration.vars);
        if let Err(err) = run_step(run, &body, &child, &iter_scope).await {
            last_err = Some(err);
        }
    }

    node.set_duration(run.ctx.elapsed() - start);
    match last_err {
        Some(err) => {
            node.set_status(Status::Failed);
            run.ctx.redraw();
            Err(err)
        }
        None => {
            node.set_status(Status::Passed);
            run.ctx.redraw();
            Ok(())
        }
    }
}

/// Invoke another job under this step's node, inheriting the current scope
/// and validating the target's `requires:` first.
async fn run_task_step(
    run: &JobRun,
    step: &Step,
    node: &Arc<Node>,
    scope: &Scope,
    task: &str,
) -> Result<(), EngineError> {
    let start = run.ctx.elapsed();
    let Some(job) = run.ctx.pipeline.jobs.get(task).cloned() else {
        // Lint catches this before execution; a miss here is a logic bug.
        let err = EngineError::Resolve(atkins_pipeline::ResolveError::UnknownJob(
            task.to_string(),
        ));
        return Err(fail_step(run, step, node, err, start));
    };

    // Loop/task boundaries must have the declared variables bound.
    let mut with_scope = scope.clone();
    if !step.with.is_empty() {
        with_scope = with_scope.overlay(step.with.clone());
    }
    if let Err(err) = validate_job_requirements(&job, &with_scope) {
        return Err(fail_step(run, step, node, EngineError::Require(err), start));
    }

    node.set_status(Status::Running);
    node.set_start(start);
    run.ctx.redraw();

    // The invoked job's subtree only exists once invoked; nested jobs are
    // never pre-rendered at the root.
    let (job_node, job_steps) = build_job_node(&job);
    node.add_child(job_node.clone());

    let result = run_job(run.ctx.clone(), job, job_node, job_steps, with_scope, false).await;

    let duration = run.ctx.elapsed() - start;
    node.set_duration(duration);
    match result {
        Ok(()) => {
            node.set_status(Status::Passed);
            run.log_step(ExecResult::Pass, &run_text(step), start, duration, None);
            run.ctx.redraw();
            Ok(())
        }
        Err(err) => {
            node.set_status(Status::Failed);
            run.log_step(
                ExecResult::Fail,
                &run_text(step),
                start,
                duration,
                Some(err.to_string()),
            );
            run.ctx.redraw();
            Err(err)
        }
    }
}

/// Interpolate and execute the step's command under the job deadline.
async fn run_command_step(
    run: &JobRun,
    step: &Step,
    node: &Arc<Node>,
    scope: &Scope,
) -> Result<(), EngineError> {
    let raw = match &step.run {
        Some(cmd) => cmd.clone(),
        None => step.cmds.join(" && "),
    };
    let start = run.ctx.elapsed();

    node.set_status(Status::Running);
    node.set_start(start);
    run.ctx.redraw();

    let interp = Interpolator::new(run.ctx.shell.as_ref());
    let command = match interp.interpolate(&raw, scope).await {
        Ok(command) => command,
        Err(err) => {
            let err: EngineError = err.into();
            run.ctx.record_exit(err.exit_code());
            return Err(fail_step(run, step, node, err, start));
        }
    };

    let Some(remaining) = run.remaining() else {
        let err = EngineError::Cancelled("job deadline exceeded".to_string());
        return Err(fail_step(run, step, node, err, start));
    };

    tracing::debug!(step = %node.id(), %command, "running step command");
    let outcome = tokio::time::timeout(
        remaining,
        run.ctx.shell.run(&command, scope.env(), step.tty),
    )
    .await;
    let duration = run.ctx.elapsed() - start;
    node.set_duration(duration);

    let output = match outcome {
        Err(_elapsed) => {
            let err = EngineError::Cancelled(format!(
                "job deadline exceeded after {:.1}s",
                run.window.as_secs_f64()
            ));
            return Err(fail_step(run, step, node, err, start));
        }
        Ok(Err(shell_err)) => {
            return Err(fail_step(run, step, node, shell_err.into(), start));
        }
        Ok(Ok(output)) => output,
    };

    if output.exit_code != 0 {
        let detail = if output.stderr.is_empty() {
            output.stdout.clone()
        } else {
            output.stderr.clone()
        };
        node.set_output(sanitize_output(&detail));
        set_leaf_statuses(node, Status::Failed);
        run.ctx.record_exit(output.exit_code);
        let err = EngineError::Exec {
            message: format!("command failed with exit code {}", output.exit_code),
            output: detail.trim_end().to_string(),
            exit_code: output.exit_code,
            trace: node.id().to_string(),
        };
        return Err(fail_step(run, step, node, err, start));
    }

    if step.passthru || step.verbose {
        node.set_output(sanitize_output(&output.stdout));
    }
    set_leaf_statuses(node, Status::Passed);
    node.set_status(Status::Passed);
    run.log_step(ExecResult::Pass, &command, start, duration, None);
    run.ctx.redraw();
    Ok(())
}

/// Mark a step failed, append its fail event, and pass the error through.
fn fail_step(
    run: &JobRun,
    step: &Step,
    node: &Arc<Node>,
    err: EngineError,
    start: f64,
) -> EngineError {
    let duration = run.ctx.elapsed() - start;
    node.set_status(Status::Failed);
    node.set_duration(duration);
    run.log_step(
        ExecResult::Fail,
        &run_text(step),
        start,
        duration,
        Some(err.to_string()),
    );
    run.ctx.redraw();
    err
}

/// Propagate an outcome to the per-command leaves of a `cmds:` step. The
/// commands run as one `&&` chain, so they share a fate.
fn set_leaf_statuses(node: &Arc<Node>, status: Status) {
    for child in node.children() {
        if child.id().contains(".cmds.") {
            child.set_status(status);
        }
    }
}
