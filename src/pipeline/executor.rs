// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Pipeline executor
//!
//! Runs the steps of a pipeline one after another, racing each one against a
//! cancellation source.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::signal::{shutdown_signal, Signal};
use crate::errors::{GociError, GociResult, StepError, FAILED_TO_EXECUTE};
use crate::steps::Step;

/// An ordered list of steps
#[derive(Clone, Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn Step>>,
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Executables that cannot be found on `PATH`, in step order, without
    /// duplicates
    pub fn missing_tools(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();

        for step in &self.steps {
            let exe = &step.spec().executable;
            if !missing.contains(exe) && which::which(exe).is_err() {
                missing.push(exe.clone());
            }
        }

        missing
    }

    /// Run every step, stopping on the first failure or on SIGINT/SIGTERM
    pub async fn run<W>(&self, out: &mut W) -> GociResult<()>
    where
        W: Write + ?Sized,
    {
        self.run_until(out, shutdown_signal()).await
    }

    /// Run every step until one fails or `cancel` resolves.
    ///
    /// Each success message is written to `out` as one line as soon as its
    /// step returns. On cancellation the in-flight step is aborted and this
    /// returns right away without waiting for the step to wind down.
    pub async fn run_until<W, F>(&self, out: &mut W, cancel: F) -> GociResult<()>
    where
        W: Write + ?Sized,
        F: Future<Output = Signal>,
    {
        tokio::pin!(cancel);
        let started = Instant::now();

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.name().to_string();
            debug!(index, step = %name, "starting step");
            let step_started = Instant::now();

            let task = Arc::clone(step);
            let mut handle = tokio::spawn(async move { task.execute().await });

            let joined = tokio::select! {
                signal = &mut cancel => {
                    handle.abort();
                    info!(index, step = %name, %signal, "run cancelled");
                    return Err(GociError::Signal { signal });
                }
                joined = &mut handle => joined,
            };

            let message = match joined {
                Ok(Ok(message)) => message,
                Ok(Err(err)) => {
                    debug!(index, step = %name, error = %err, "step failed");
                    return Err(err.into());
                }
                Err(join_err) => {
                    warn!(index, step = %name, error = %join_err, "step task died");
                    return Err(StepError::new(name, FAILED_TO_EXECUTE)
                        .with_cause(join_err)
                        .into());
                }
            };

            writeln!(out, "{}", message).map_err(|source| GociError::SinkWrite { source })?;

            info!(
                index,
                step = %name,
                elapsed_ms = step_started.elapsed().as_millis() as u64,
                "step succeeded"
            );
        }

        debug!(
            steps = self.steps.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "pipeline completed"
        );

        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.spec()))
            .finish()
    }
}
