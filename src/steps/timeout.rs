// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Timeout step
//!
//! Runs a process under a deadline. Expiry drops the runner future, which
//! stops the process, and is reported as `failed timeout` whatever the
//! process itself ended with.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::{run_checked, Step, StepKind, StepSpec};
use crate::command::CommandRunner;
use crate::errors::StepError;

/// Deadline used when a timeout step is configured with zero
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Step that must finish successfully before its deadline
pub struct TimeoutStep {
    spec: StepSpec,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl TimeoutStep {
    /// Create a timeout step; a zero `timeout` means [`DEFAULT_TIMEOUT`]
    pub fn new(spec: StepSpec, timeout: Duration, runner: Arc<dyn CommandRunner>) -> Self {
        let timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        Self {
            spec,
            timeout,
            runner,
        }
    }

    /// The effective deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Step for TimeoutStep {
    fn spec(&self) -> &StepSpec {
        &self.spec
    }

    fn kind(&self) -> StepKind {
        StepKind::Timeout(self.timeout)
    }

    async fn execute(&self) -> Result<String, StepError> {
        let invocation = self.spec.invocation();
        debug!(
            step = %self.spec.name,
            command = %invocation,
            timeout_ms = self.timeout.as_millis() as u64,
            "running with deadline"
        );

        let run = run_checked(self.runner.as_ref(), &invocation);
        match tokio::time::timeout(self.timeout, run).await {
            Ok(Ok(_)) => Ok(self.spec.success_message.clone()),
            Ok(Err(e)) => Err(StepError::execution(&self.spec.name, e)),
            Err(_) => {
                debug!(
                    step = %self.spec.name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "deadline exceeded"
                );
                Err(StepError::timeout(&self.spec.name))
            }
        }
    }
}
