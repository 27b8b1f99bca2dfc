// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Run command - execute the pipeline or print its plan

use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::{Cli, OutputFormat};
use crate::command::SystemRunner;
use crate::errors::{GociError, GociResult};
use crate::pipeline::{
    self, require_project_dir, shutdown_signal, Pipeline, PipelineConfig, CONFIG_FILE_NAME,
};

/// Run the pipeline described by the command line, writing step lines to
/// `out`
pub async fn run<W>(cli: &Cli, out: &mut W) -> GociResult<()>
where
    W: Write + ?Sized,
{
    let project_dir = Path::new(&cli.proj);
    require_project_dir(project_dir)?;

    let config = load_config(project_dir, cli.config.as_deref())?;
    let runner = Arc::new(SystemRunner::new());

    if cli.dry_run {
        config.validate()?;
        let pipeline = config.assemble(project_dir, runner);
        return print_plan(&pipeline, project_dir, cli.format, out);
    }

    pipeline::run_project(&config, project_dir, runner, out, shutdown_signal()).await
}

/// Explicit `--config` must exist; otherwise use `<DIR>/.goci.yaml` if present
fn load_config(project_dir: &Path, explicit: Option<&Path>) -> GociResult<PipelineConfig> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!("no {} found, using built-in steps", CONFIG_FILE_NAME);
                return Ok(PipelineConfig::default());
            }
            candidate
        }
    };

    debug!(path = %path.display(), "loading configuration");
    PipelineConfig::from_file(&path)
}

#[derive(Debug, Serialize)]
struct Plan<'a> {
    project: String,
    steps: Vec<PlannedStep<'a>>,
    missing_tools: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlannedStep<'a> {
    name: &'a str,
    kind: String,
    command: String,
    message: &'a str,
}

/// Print the execution plan
fn print_plan<W>(
    pipeline: &Pipeline,
    project_dir: &Path,
    format: OutputFormat,
    out: &mut W,
) -> GociResult<()>
where
    W: Write + ?Sized,
{
    let plan = Plan {
        project: project_dir.display().to_string(),
        steps: pipeline
            .steps()
            .iter()
            .map(|step| PlannedStep {
                name: step.name(),
                kind: step.kind().to_string(),
                command: step.spec().invocation().to_string(),
                message: &step.spec().success_message,
            })
            .collect(),
        missing_tools: pipeline.missing_tools(),
    };

    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&plan)?,
        OutputFormat::Text => render_plan(&plan),
    };

    writeln!(out, "{}", text).map_err(|source| GociError::SinkWrite { source })
}

fn render_plan(plan: &Plan<'_>) -> String {
    let mut text = String::new();

    text.push_str(&format!("{}: {}\n", "Project".bold(), plan.project));
    text.push_str(&format!("{}\n", "═".repeat(50)));
    text.push_str(&format!(
        "Execution plan ({} step{}):\n\n",
        plan.steps.len(),
        if plan.steps.len() == 1 { "" } else { "s" }
    ));

    for (i, step) in plan.steps.iter().enumerate() {
        text.push_str(&format!(
            "  {}. {} {} {}\n",
            i + 1,
            step.name.bold(),
            format!("[{}]", step.kind).dimmed(),
            step.command.cyan()
        ));
    }

    if !plan.missing_tools.is_empty() {
        text.push('\n');
        text.push_str(&format!("{}:\n", "Missing tools".yellow().bold()));
        for tool in &plan.missing_tools {
            text.push_str(&format!("  {} {}\n", "✗".red(), tool));
        }
    }

    text
}
