// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Error types
//!
//! Two layers: [`StepError`] is raised by a single step and names the step
//! that failed, [`GociError`] is what a pipeline run returns to its caller.

use miette::Diagnostic;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Signal;

/// Result type for goci operations
pub type GociResult<T> = Result<T, GociError>;

/// Boxed cause carried by a [`StepError`]
pub type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Category message for a step whose process could not run or exited non-zero
pub const FAILED_TO_EXECUTE: &str = "failed to execute";

/// Category message for a step that exceeded its deadline
pub const FAILED_TIMEOUT: &str = "failed timeout";

/// Error returned by a pipeline run
#[derive(Error, Debug, Diagnostic)]
pub enum GociError {
    #[error("{reason}: validation failed")]
    #[diagnostic(
        code(goci::validation),
        help("Pass the project directory with --proj or GOCI_PROJ")
    )]
    Validation { reason: String },

    #[error(transparent)]
    #[diagnostic(code(goci::step_failed))]
    Step(#[from] StepError),

    #[error("received signal {signal}: signal received")]
    #[diagnostic(code(goci::signal))]
    Signal { signal: Signal },

    #[error("failed to write step output: {source}")]
    #[diagnostic(code(goci::sink_write))]
    SinkWrite {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pipeline configuration: {reason}")]
    #[diagnostic(code(goci::invalid_config))]
    InvalidConfig {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(goci::file_read_error))]
    FileRead { path: PathBuf, error: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(goci::yaml_error))]
    Yaml { message: String },

    #[error("Failed to render output: {message}")]
    #[diagnostic(code(goci::json_error))]
    Json { message: String },
}

impl From<serde_yaml::Error> for GociError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for GociError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl GociError {
    /// The step error behind this error, if a step failed
    pub fn as_step(&self) -> Option<&StepError> {
        match self {
            Self::Step(err) => Some(err),
            _ => None,
        }
    }

    /// The signal that cancelled the run, if any
    pub fn signal(&self) -> Option<Signal> {
        match self {
            Self::Signal { signal } => Some(*signal),
            _ => None,
        }
    }
}

/// A failure raised by one step of the pipeline.
///
/// Equality of step errors is deliberately not structural: two errors are the
/// same kind of failure when they come from the same step, which is what
/// [`StepError::matches`] checks. `PartialEq` is not implemented so that the
/// two notions cannot be confused.
pub struct StepError {
    step: String,
    message: String,
    cause: Option<Cause>,
}

impl StepError {
    /// Create an error for `step` with a category message and no cause
    pub fn new(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying error
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The process could not be spawned or exited unsuccessfully
    pub fn execution(step: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self::new(step, FAILED_TO_EXECUTE).with_cause(cause)
    }

    /// The step ran past its deadline
    pub fn timeout(step: impl Into<String>) -> Self {
        Self::new(step, FAILED_TIMEOUT).with_cause(DeadlineExceeded)
    }

    /// The tool succeeded but reported findings on stdout
    ///
    /// The output is quoted with Rust debug escaping, so a control byte shows
    /// as `\u{1}` rather than `\x01`. Output reaching this point was already
    /// decoded lossily, so invalid UTF-8 appears as U+FFFD.
    pub fn invalid_format(step: impl Into<String>, output: &str) -> Self {
        Self::new(step, format!("invalid format: {:?}", output))
    }

    /// Name of the step that failed
    pub fn step(&self) -> &str {
        &self.step
    }

    /// Short failure category
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying error, if any
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Whether `other` is the same kind of failure, i.e. raised by the same step
    pub fn matches(&self, other: &StepError) -> bool {
        self.step == other.step
    }

    /// Whether this error was caused by a deadline
    pub fn is_timeout(&self) -> bool {
        self.cause()
            .map(|cause| cause.is::<DeadlineExceeded>())
            .unwrap_or(false)
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step: {:?}: {}", self.step, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ": Cause: {}", cause)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepError")
            .field("step", &self.step)
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish()
    }
}

impl StdError for StepError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Sentinel cause of a [`StepError`] raised when a step's deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

/// Why a subprocess did not complete successfully
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exit status {code}")]
    Exit { code: i32, stderr: String },

    #[error("terminated by signal")]
    Killed { stderr: String },
}
