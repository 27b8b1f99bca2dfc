// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Helpers for tests that deliver real signals to the test process.
//!
//! Signal delivery is process-wide, so each test binary holds a single test.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use goci::{CommandRunner, Pipeline, PlainStep, StepSpec, SystemRunner};
use tokio::task::JoinHandle;

/// A quick step followed by a step running `slow` in `sh`
pub fn pipeline_with_slow_step(dir: &Path, slow: &str) -> Pipeline {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    Pipeline::new()
        .with_step(PlainStep::new(
            StepSpec::new("quick", "sh", dir, "quick: successful", ["-c", "exit 0"]),
            runner.clone(),
        ))
        .with_step(PlainStep::new(
            StepSpec::new("slow", "sh", dir, "slow: successful", ["-c", slow]),
            runner,
        ))
}

/// Send `signal` (as named by `kill`, e.g. `TERM`) to this process after `delay`
pub fn send_after(signal: &'static str, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let status = tokio::process::Command::new("kill")
            .arg(format!("-{}", signal))
            .arg(std::process::id().to_string())
            .status()
            .await
            .expect("kill should run");
        assert!(status.success(), "kill -{} failed", signal);
    })
}
