// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 goci contributors

//! Operator cancellation
//!
//! A run is cancelled by whichever of SIGINT or SIGTERM arrives first. The
//! signal streams only live as long as the future returned by
//! [`shutdown_signal`], but the OS-level handler stays installed for the
//! rest of the process.

use std::fmt;
use tracing::warn;

/// An external request to stop the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// SIGINT or Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "interrupt"),
            Self::Terminate => write!(f, "terminated"),
        }
    }
}

/// Resolve with the first interrupt or termination signal delivered to the
/// process. Never resolves if the handlers cannot be installed.
///
/// Once this has been polled, tokio keeps its handler for SIGINT and SIGTERM
/// installed until the process exits, even after the future is dropped. A
/// later SIGINT or SIGTERM no longer terminates the process; it is only seen
/// by another `shutdown_signal` (or tokio signal stream). Library callers that
/// keep running after a pipeline must install their own shutdown handling.
#[cfg(unix)]
pub async fn shutdown_signal() -> Signal {
    use tokio::signal::unix::{signal, SignalKind};

    let handlers = signal(SignalKind::interrupt())
        .and_then(|interrupt| Ok((interrupt, signal(SignalKind::terminate())?)));

    match handlers {
        Ok((mut interrupt, mut terminate)) => {
            tokio::select! {
                _ = interrupt.recv() => Signal::Interrupt,
                _ = terminate.recv() => Signal::Terminate,
            }
        }
        Err(e) => {
            warn!(error = %e, "cannot install signal handlers; run is not cancellable");
            std::future::pending().await
        }
    }
}

/// Resolve with the first Ctrl-C delivered to the process. Never resolves if
/// the handler cannot be installed.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> Signal {
    match tokio::signal::ctrl_c().await {
        Ok(()) => Signal::Interrupt,
        Err(e) => {
            warn!(error = %e, "cannot install Ctrl-C handler; run is not cancellable");
            std::future::pending().await
        }
    }
}
