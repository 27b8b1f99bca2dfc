// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Pipeline configuration
//!
//! Defines the schema for `.goci.yaml`. The pipeline always has the same four
//! steps in the same order (build, test, format check, push); the file can
//! only change what each of them runs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::Pipeline;
use crate::command::CommandRunner;
use crate::errors::{GociError, GociResult};
use crate::steps::{PlainStep, StepSpec, TimeoutStep, ValidatingStep, DEFAULT_TIMEOUT};

/// Default configuration file name, looked up in the project directory
pub const CONFIG_FILE_NAME: &str = ".goci.yaml";

/// Pipeline configuration from `.goci.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Build step overrides
    #[serde(default)]
    pub build: StepConfig,

    /// Test step overrides
    #[serde(default)]
    pub test: StepConfig,

    /// Format check overrides
    #[serde(default)]
    pub format: StepConfig,

    /// Push step overrides
    #[serde(default)]
    pub push: StepConfig,

    /// Environment variables passed to every step
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Overrides for one step; unset fields keep the built-in value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// Step name used in errors and logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Program to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Program arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Line printed on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Deadline in seconds (push step only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Built-in definition of one of the four steps
struct Builtin {
    section: &'static str,
    name: &'static str,
    executable: &'static str,
    args: &'static [&'static str],
    message: &'static str,
}

const BUILD: Builtin = Builtin {
    section: "build",
    name: "go build",
    executable: "go",
    args: &["build", ".", "errors"],
    message: "go build: successful",
};

const TEST: Builtin = Builtin {
    section: "test",
    name: "go test",
    executable: "go",
    args: &["test", "-v"],
    message: "go test: successful",
};

const FORMAT: Builtin = Builtin {
    section: "format",
    name: "go fmt",
    executable: "gofmt",
    args: &["-l", "."],
    message: "gofmt: successful",
};

const PUSH: Builtin = Builtin {
    section: "push",
    name: "git push",
    executable: "git",
    args: &["push", "origin", "main"],
    message: "git push: successful",
};

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> GociResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GociError::FileRead {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string; an empty document is the
    /// built-in pipeline
    pub fn from_yaml(yaml: &str) -> GociResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> GociResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Check the overrides make sense
    pub fn validate(&self) -> GociResult<()> {
        for (builtin, step) in [
            (&BUILD, &self.build),
            (&TEST, &self.test),
            (&FORMAT, &self.format),
            (&PUSH, &self.push),
        ] {
            if step.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
                return Err(invalid(builtin, "name is empty"));
            }
            if step.executable.as_deref().is_some_and(|e| e.trim().is_empty()) {
                return Err(invalid(builtin, "executable is empty"));
            }
            if step.timeout_secs.is_some() && builtin.section != PUSH.section {
                return Err(GociError::InvalidConfig {
                    reason: format!("'{}.timeout_secs' is not supported", builtin.section),
                    help: Some("Only the push step runs under a deadline".into()),
                });
            }
        }

        Ok(())
    }

    /// Deadline of the push step
    pub fn push_timeout(&self) -> Duration {
        self.push
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Build the four-step pipeline for `project_dir`
    pub fn assemble(&self, project_dir: &Path, runner: Arc<dyn CommandRunner>) -> Pipeline {
        let spec = |builtin: &Builtin, step: &StepConfig| {
            step.resolve(builtin, project_dir).with_env(self.env.clone())
        };

        Pipeline::new()
            .with_step(PlainStep::new(spec(&BUILD, &self.build), runner.clone()))
            .with_step(PlainStep::new(spec(&TEST, &self.test), runner.clone()))
            .with_step(ValidatingStep::new(spec(&FORMAT, &self.format), runner.clone()))
            .with_step(TimeoutStep::new(
                spec(&PUSH, &self.push),
                self.push_timeout(),
                runner,
            ))
    }
}

impl StepConfig {
    fn resolve(&self, builtin: &Builtin, project_dir: &Path) -> StepSpec {
        let args = match &self.args {
            Some(args) => args.clone(),
            None => builtin.args.iter().map(|a| a.to_string()).collect(),
        };

        StepSpec::new(
            self.name.as_deref().unwrap_or(builtin.name),
            self.executable.as_deref().unwrap_or(builtin.executable),
            project_dir,
            self.message.as_deref().unwrap_or(builtin.message),
            args,
        )
    }
}

fn invalid(builtin: &Builtin, reason: &str) -> GociError {
    GociError::InvalidConfig {
        reason: format!("step '{}': {}", builtin.section, reason),
        help: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::ScriptedRunner;
    use crate::steps::StepKind;
    use std::path::PathBuf;

    fn runner() -> Arc<dyn CommandRunner> {
        Arc::new(ScriptedRunner::new())
    }

    #[test]
    fn test_default_pipeline_shape() {
        let pipeline = PipelineConfig::default().assemble(Path::new("./proj"), runner());
        let steps = pipeline.steps();

        assert_eq!(steps.len(), 4);

        let names: Vec<_> = steps.iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["go build", "go test", "go fmt", "git push"]);

        assert_eq!(steps[0].kind(), StepKind::Plain);
        assert_eq!(steps[1].kind(), StepKind::Plain);
        assert_eq!(steps[2].kind(), StepKind::Validating);
        assert_eq!(steps[3].kind(), StepKind::Timeout(Duration::from_secs(10)));

        let fmt = steps[2].spec();
        assert_eq!(fmt.executable, "gofmt");
        assert_eq!(fmt.args, vec!["-l", "."]);
        assert_eq!(fmt.working_dir, PathBuf::from("./proj"));
        assert_eq!(fmt.success_message, "gofmt: successful");

        assert_eq!(steps[3].spec().args, vec!["push", "origin", "main"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(PipelineConfig::from_yaml("").unwrap(), PipelineConfig::default());
        assert_eq!(PipelineConfig::from_yaml("{}").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let yaml = r#"
push:
  args: ["push", "upstream", "release"]
  timeout_secs: 30
format:
  executable: rustfmt
  args: ["--check", "src/lib.rs"]
  message: "fmt ok"
env:
  CGO_ENABLED: "0"
"#;
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        config.validate().unwrap();

        let pipeline = config.assemble(Path::new("."), runner());
        let steps = pipeline.steps();

        assert_eq!(steps[2].name(), "go fmt");
        assert_eq!(steps[2].spec().executable, "rustfmt");
        assert_eq!(steps[2].spec().success_message, "fmt ok");
        assert_eq!(steps[3].spec().args, vec!["push", "upstream", "release"]);
        assert_eq!(steps[3].kind(), StepKind::Timeout(Duration::from_secs(30)));
        for step in steps {
            assert_eq!(step.spec().env.get("CGO_ENABLED").map(String::as_str), Some("0"));
        }
    }

    #[test]
    fn test_zero_push_timeout_falls_back() {
        let config = PipelineConfig::from_yaml("push:\n  timeout_secs: 0\n").unwrap();
        let pipeline = config.assemble(Path::new("."), runner());
        assert_eq!(pipeline.steps()[3].kind(), StepKind::Timeout(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = PipelineConfig::from_yaml("deploy:\n  executable: kubectl\n").unwrap_err();
        assert!(matches!(err, GociError::Yaml { .. }));
    }

    #[test]
    fn test_timeout_only_on_push() {
        let config = PipelineConfig::from_yaml("build:\n  timeout_secs: 5\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GociError::InvalidConfig { .. }));
    }

    #[test]
    fn test_empty_executable_rejected() {
        let config = PipelineConfig::from_yaml("test:\n  executable: \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PipelineConfig::from_file(&dir.path().join(CONFIG_FILE_NAME)).unwrap_err();
        assert!(matches!(err, GociError::FileRead { .. }));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_overrides() {
        let mut config = PipelineConfig::default();
        config.push.timeout_secs = Some(20);

        let yaml = config.to_yaml().unwrap();
        assert_eq!(PipelineConfig::from_yaml(&yaml).unwrap(), config);
    }
}
