// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! atkins - declarative pipeline runner

use anyhow::{anyhow, Context, Result};
use atkins_engine::{Executor, PipelineOptions};
use atkins_pipeline::{discover_config, load_file};
use atkins_shell::SystemShell;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "atkins",
    version,
    about = "Atkins - a declarative pipeline runner for local development and CI"
)]
struct Cli {
    /// Change to <dir> before doing anything
    #[arg(short = 'C', value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Pipeline file (default: discover .atkins.yml walking up from cwd)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Run only this job and its dependencies
    #[arg(short = 'j', long = "job", value_name = "JOB")]
    job: Option<String>,

    /// Write the event log to this path
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Record the scheduler thread on each event
    #[arg(long)]
    debug: bool,

    /// Suppress live redraw; emit only the final static tree
    #[arg(long = "final-only")]
    final_only: bool,

    /// Job to run (same as --job)
    #[arg(value_name = "JOB")]
    job_name: Option<String>,
}

#[tokio::main]
async fn main() {
    let code = run().await.unwrap_or_else(|err| {
        eprintln!("atkins: {err:#}");
        1
    });
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("cannot change to {}", dir.display()))?;
    }

    let file = match cli.file {
        Some(file) => file,
        None => {
            let cwd = std::env::current_dir().context("cannot determine working directory")?;
            discover_config(&cwd).ok_or_else(|| {
                anyhow!("no pipeline config found (.atkins.yml / atkins.yml walking up from cwd)")
            })?
        }
    };

    let pipeline = load_file(&file)?;

    let options = PipelineOptions {
        job: cli.job.or(cli.job_name),
        log_file: cli.log_file,
        pipeline_file: Some(file.clone()),
        debug: cli.debug,
        final_only: cli.final_only,
        ..PipelineOptions::default()
    };

    let executor = Executor::new(Arc::new(SystemShell::new()), options);
    let report = match executor.execute_pipeline(&pipeline).await {
        Ok(report) => report,
        Err(err) => {
            // Lint, resolve, and variable errors abort before execution.
            eprintln!("atkins: {err}");
            return Ok(1);
        }
    };

    if report.exit_code != 0 {
        let name = if pipeline.name.is_empty() {
            file.display().to_string()
        } else {
            pipeline.name.clone()
        };
        eprintln!("{} failed (exit {})", name, report.exit_code);
        if let Some(output) = &report.error_output {
            for line in output.lines() {
                eprintln!("    {line}");
            }
        }
    }

    Ok(report.exit_code)
}
