// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Subprocess boundary
//!
//! Steps never spawn processes themselves. They describe what to run as an
//! [`Invocation`] and hand it to a [`CommandRunner`] chosen when the pipeline
//! is assembled, so tests can substitute the runner without touching real
//! tools.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::trace;

/// A fully resolved subprocess to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Directory the process runs in
    pub working_dir: PathBuf,
    /// Extra environment on top of the inherited one
    pub env: HashMap<String, String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished subprocess left behind
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Wall time
    pub duration: Duration,
}

impl CommandOutput {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to run an [`Invocation`] to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the process and wait for it.
    ///
    /// An `Err` means the process could not be started at all; a process that
    /// ran and failed is reported through [`CommandOutput::exit_code`].
    /// Dropping the returned future must stop the process.
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput>;
}

/// Runs invocations as real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
        let start = Instant::now();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.current_dir(&invocation.working_dir);
        cmd.envs(&invocation.env);
        cmd.stdin(Stdio::null());
        // A deadline or an interrupt drops this future; take the child with it.
        cmd.kill_on_drop(true);

        let output = cmd.output().await?;
        let duration = start.elapsed();

        trace!(
            command = %invocation,
            status = ?output.status.code(),
            elapsed_ms = duration.as_millis() as u64,
            "process finished"
        );

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration,
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner used by unit tests in place of real tools

    use super::*;
    use std::sync::Mutex;

    /// How a scripted program behaves
    #[derive(Debug, Clone, Default)]
    pub struct Script {
        pub exit_code: i32,
        pub stdout: String,
        pub delay: Duration,
        pub spawn_error: bool,
    }

    impl Script {
        pub fn ok() -> Self {
            Self::default()
        }

        pub fn exit(code: i32) -> Self {
            Self {
                exit_code: code,
                ..Self::default()
            }
        }

        pub fn printing(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_string(),
                ..Self::default()
            }
        }

        pub fn sleeping(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::default()
            }
        }

        pub fn unspawnable() -> Self {
            Self {
                spawn_error: true,
                ..Self::default()
            }
        }
    }

    /// Answers invocations by program name and records every call
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script(mut self, program: &str, script: Script) -> Self {
            self.scripts.insert(program.to_string(), script);
            self
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(&self, invocation: &Invocation) -> std::io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(invocation.clone());

            let script = self
                .scripts
                .get(&invocation.program)
                .cloned()
                .unwrap_or_default();

            if script.spawn_error {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "program not found",
                ));
            }

            if !script.delay.is_zero() {
                tokio::time::sleep(script.delay).await;
            }

            Ok(CommandOutput {
                exit_code: Some(script.exit_code),
                stdout: script.stdout,
                stderr: String::new(),
                duration: script.delay,
            })
        }
    }
}
