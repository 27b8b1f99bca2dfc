// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Pipeline definitions and execution
//!
//! Entry points for running the build/test/format/push pipeline against a
//! project directory.

mod definition;
mod executor;
mod signal;

pub use definition::{PipelineConfig, StepConfig, CONFIG_FILE_NAME};
pub use executor::Pipeline;
pub use signal::{shutdown_signal, Signal};

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::command::{CommandRunner, SystemRunner};
use crate::errors::{GociError, GociResult};

/// Fail unless a project directory was given
pub fn require_project_dir(project_dir: &Path) -> GociResult<()> {
    if project_dir.as_os_str().is_empty() {
        return Err(GociError::Validation {
            reason: "project dir is required".into(),
        });
    }
    Ok(())
}

/// Run the built-in pipeline against `project_dir` with real processes,
/// cancelled by SIGINT/SIGTERM
pub async fn run<W>(project_dir: impl AsRef<Path>, out: &mut W) -> GociResult<()>
where
    W: Write + ?Sized,
{
    run_project(
        &PipelineConfig::default(),
        project_dir.as_ref(),
        Arc::new(SystemRunner::new()),
        out,
        shutdown_signal(),
    )
    .await
}

/// Validate the inputs, assemble the pipeline from `config` and run it until
/// it finishes, fails, or `cancel` resolves
pub async fn run_project<W, F>(
    config: &PipelineConfig,
    project_dir: &Path,
    runner: Arc<dyn CommandRunner>,
    out: &mut W,
    cancel: F,
) -> GociResult<()>
where
    W: Write + ?Sized,
    F: Future<Output = Signal>,
{
    require_project_dir(project_dir)?;
    config.validate()?;

    let pipeline = config.assemble(project_dir, runner);
    debug!(project = %project_dir.display(), steps = pipeline.len(), "pipeline assembled");

    pipeline.run_until(out, cancel).await
}
