// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Validating step
//!
//! For linters and format checkers that exit 0 but list offending files on
//! stdout. Any stdout at all is a failure.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{run_checked, Step, StepKind, StepSpec};
use crate::command::CommandRunner;
use crate::errors::StepError;

/// Step that succeeds when its process exits 0 without printing anything
pub struct ValidatingStep {
    spec: StepSpec,
    runner: Arc<dyn CommandRunner>,
}

impl ValidatingStep {
    /// Create a validating step
    pub fn new(spec: StepSpec, runner: Arc<dyn CommandRunner>) -> Self {
        Self { spec, runner }
    }
}

#[async_trait]
impl Step for ValidatingStep {
    fn spec(&self) -> &StepSpec {
        &self.spec
    }

    fn kind(&self) -> StepKind {
        StepKind::Validating
    }

    async fn execute(&self) -> Result<String, StepError> {
        let invocation = self.spec.invocation();
        debug!(step = %self.spec.name, command = %invocation, "running");

        // A crash wins over findings.
        let output = run_checked(self.runner.as_ref(), &invocation)
            .await
            .map_err(|e| StepError::execution(&self.spec.name, e))?;

        if !output.stdout.is_empty() {
            return Err(StepError::invalid_format(&self.spec.name, &output.stdout));
        }

        Ok(self.spec.success_message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::{Script, ScriptedRunner};
    use crate::errors::FAILED_TO_EXECUTE;

    fn fmt_spec() -> StepSpec {
        StepSpec::new("go fmt", "gofmt", "./project", "gofmt: successful", ["-l", "."])
    }

    #[tokio::test]
    async fn test_clean_run_succeeds() {
        let runner = Arc::new(ScriptedRunner::new().script("gofmt", Script::ok()));
        let step = ValidatingStep::new(fmt_spec(), runner);

        assert_eq!(step.execute().await.unwrap(), "gofmt: successful");
    }

    #[tokio::test]
    async fn test_output_on_success_is_invalid_format() {
        let runner = Arc::new(ScriptedRunner::new().script("gofmt", Script::printing("add.go\n")));
        let step = ValidatingStep::new(fmt_spec(), runner);

        let err = step.execute().await.unwrap_err();
        assert_eq!(err.step(), "go fmt");
        assert!(err.message().starts_with("invalid format:"));
        assert_eq!(err.message(), "invalid format: \"add.go\\n\"");
        assert!(err.cause().is_none());
    }

    #[tokio::test]
    async fn test_process_failure_checked_first() {
        let runner = Arc::new(ScriptedRunner::new().script(
            "gofmt",
            Script {
                exit_code: 2,
                stdout: "add.go\n".into(),
                ..Script::default()
            },
        ));
        let step = ValidatingStep::new(fmt_spec(), runner);

        let err = step.execute().await.unwrap_err();
        assert_eq!(err.message(), FAILED_TO_EXECUTE);
        assert!(err.cause().is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_real_process_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let spec = StepSpec::new(
            "lint",
            "sh",
            dir.path(),
            "lint: successful",
            ["-c", "echo finding"],
        );
        let step = ValidatingStep::new(spec, Arc::new(crate::command::SystemRunner::new()));

        let err = step.execute().await.unwrap_err();
        assert_eq!(err.message(), "invalid format: \"finding\\n\"");
    }
}
