// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! goci - local build and release pipeline
//!
//! Prints one line per successful step on stdout. On failure prints a single
//! `error: ` line on stderr and exits with status 1.

use clap::Parser;
use miette::Diagnostic;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use goci::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout belongs to the step lines, so logs go to stderr
    let default_filter = if cli.verbose { "goci=debug" } else { "goci=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut stdout = std::io::stdout();
    match goci::cli::run::run(&cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            // stderr carries exactly one error line; the hint is a log event
            if let Some(help) = e.help() {
                tracing::debug!(%help, "hint");
            }
            ExitCode::FAILURE
        }
    }
}
