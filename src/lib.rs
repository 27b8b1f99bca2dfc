// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! # goci - local build and release pipeline
//!
//! `goci` runs a fixed sequence of external tools against a project
//! directory and stops at the first failure:
//!
//! 1. `go build` - must exit 0
//! 2. `go test` - must exit 0
//! 3. `gofmt -l` - must exit 0 and list nothing
//! 4. `git push` - must exit 0 within its deadline
//!
//! Every successful step prints one line. SIGINT and SIGTERM end the run
//! early with a signal error.
//!
//! ## Quick Start
//!
//! ```bash
//! goci --proj ./my-service
//!
//! # Show what would run
//! goci --proj ./my-service --dry-run
//! ```
//!
//! From Rust:
//!
//! ```no_run
//! # async fn demo() -> goci::GociResult<()> {
//! let mut out = std::io::stdout();
//! goci::pipeline::run("./my-service", &mut out).await
//! # }
//! ```

pub mod cli;
pub mod command;
pub mod errors;
pub mod pipeline;
pub mod steps;

// Re-export commonly used types
pub use command::{CommandRunner, Invocation, SystemRunner};
pub use errors::{GociError, GociResult, StepError};
pub use pipeline::{Pipeline, PipelineConfig, Signal};
pub use steps::{PlainStep, Step, StepSpec, TimeoutStep, ValidatingStep};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
