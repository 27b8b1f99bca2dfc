// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! CLI definitions and handlers
//!
//! Defines the command-line interface for goci.

pub mod run;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Local build and release pipeline
///
/// Builds, tests, format-checks and pushes a project, stopping at the first
/// failure.
#[derive(Parser, Debug)]
#[clap(
    name = "goci",
    version,
    about = "Local build and release pipeline: build, test, format check, push",
    long_about = None,
    after_help = "Examples:\n\
        goci --proj .                   Run the pipeline on the current directory\n\
        goci --proj . --dry-run         Show the steps without running them\n\
        goci --proj . -c ci.yaml        Use a custom step configuration"
)]
pub struct Cli {
    /// Project directory
    #[clap(short, long, env = "GOCI_PROJ", value_name = "DIR", default_value = "")]
    pub proj: String,

    /// Step configuration file (default: <DIR>/.goci.yaml when present)
    #[clap(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show the execution plan without running anything
    #[clap(long)]
    pub dry_run: bool,

    /// Output format for --dry-run
    #[clap(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,
}

/// Output format for the execution plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
