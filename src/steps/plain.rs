// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Plain step
//!
//! Runs a process and fails when it exits non-zero.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{run_checked, Step, StepKind, StepSpec};
use crate::command::CommandRunner;
use crate::errors::StepError;

/// Step that succeeds when its process exits 0
pub struct PlainStep {
    spec: StepSpec,
    runner: Arc<dyn CommandRunner>,
}

impl PlainStep {
    /// Create a plain step
    pub fn new(spec: StepSpec, runner: Arc<dyn CommandRunner>) -> Self {
        Self { spec, runner }
    }
}

#[async_trait]
impl Step for PlainStep {
    fn spec(&self) -> &StepSpec {
        &self.spec
    }

    fn kind(&self) -> StepKind {
        StepKind::Plain
    }

    async fn execute(&self) -> Result<String, StepError> {
        let invocation = self.spec.invocation();
        debug!(step = %self.spec.name, command = %invocation, "running");

        run_checked(self.runner.as_ref(), &invocation)
            .await
            .map_err(|e| StepError::execution(&self.spec.name, e))?;

        Ok(self.spec.success_message.clone())
    }
}
