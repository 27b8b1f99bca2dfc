// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Pipeline steps
//!
//! This module provides the [`Step`] trait and its three variants. All of
//! them share a [`StepSpec`] and differ only in what counts as success.

mod plain;
mod timeout;
mod validating;

pub use plain::PlainStep;
pub use timeout::{TimeoutStep, DEFAULT_TIMEOUT};
pub use validating::ValidatingStep;

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::command::{CommandOutput, CommandRunner, Invocation};
use crate::errors::{ProcessError, StepError};

/// Static description of a step, shared by every variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    /// Step name, used in errors and logs
    pub name: String,
    /// Program to invoke
    pub executable: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Directory the program runs in
    pub working_dir: PathBuf,
    /// Line reported when the step succeeds
    pub success_message: String,
    /// Extra environment for the program
    pub env: HashMap<String, String>,
}

impl StepSpec {
    /// Create a step description
    pub fn new(
        name: impl Into<String>,
        executable: impl Into<String>,
        working_dir: impl Into<PathBuf>,
        success_message: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            executable: executable.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
            success_message: success_message.into(),
            env: HashMap::new(),
        }
    }

    /// Set extra environment variables
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// The subprocess this step runs
    pub fn invocation(&self) -> Invocation {
        Invocation {
            program: self.executable.clone(),
            args: self.args.clone(),
            working_dir: self.working_dir.clone(),
            env: self.env.clone(),
        }
    }
}

/// Which success policy a step applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Succeeds when the process exits 0
    Plain,
    /// Succeeds when the process exits 0 and prints nothing
    Validating,
    /// Succeeds when the process exits 0 before the deadline
    Timeout(Duration),
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Validating => write!(f, "validating"),
            Self::Timeout(limit) => write!(f, "timeout {}s", limit.as_secs_f64()),
        }
    }
}

/// A single unit of pipeline work
#[async_trait]
pub trait Step: Send + Sync {
    /// Static description of the step
    fn spec(&self) -> &StepSpec;

    /// Success policy of the step
    fn kind(&self) -> StepKind;

    /// Run the step once, returning its success message
    async fn execute(&self) -> Result<String, StepError>;

    /// Step name
    fn name(&self) -> &str {
        &self.spec().name
    }
}

/// Run `invocation` and turn anything but a clean exit into a [`ProcessError`]
pub(crate) async fn run_checked(
    runner: &dyn CommandRunner,
    invocation: &Invocation,
) -> Result<CommandOutput, ProcessError> {
    let output = runner
        .run(invocation)
        .await
        .map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

    match output.exit_code {
        Some(0) => Ok(output),
        Some(code) => Err(ProcessError::Exit {
            code,
            stderr: output.stderr,
        }),
        None => Err(ProcessError::Killed {
            stderr: output.stderr,
        }),
    }
}
