// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::time::Duration;

use tokio::signal::unix::{Signal, SignalKind};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// How long to wait for in-flight work after the first shutdown signal
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// Coordinates the graceful shutdown of the process.
///
/// The first SIGTERM/SIGINT cancels the shutdown token: the server stops
/// accepting requests and the worker stops scheduling runs, but in-flight
/// work finishes. Long-running tasks are spawned on the `task_tracker`,
/// which is how the manager knows when that phase is complete. A second
/// signal, or the timeout, makes [`ShutdownManager::run`] return without
/// waiting further; dropping the runtime then aborts whatever is left.
pub struct ShutdownManager {
    soft_shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
    sigterm: Signal,
    sigint: Signal,
}

impl ShutdownManager {
    /// Create a new shutdown manager, installing the signal handlers
    ///
    /// # Errors
    ///
    /// Returns an error if the signal handlers could not be installed
    pub fn new() -> Result<Self, std::io::Error> {
        let sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
        let sigint = tokio::signal::unix::signal(SignalKind::interrupt())?;

        Ok(Self {
            soft_shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
            sigterm,
            sigint,
        })
    }

    /// Get a reference to the task tracker
    #[must_use]
    pub fn task_tracker(&self) -> &TaskTracker {
        &self.task_tracker
    }

    /// Get a cancellation token cancelled when the shutdown starts
    #[must_use]
    pub fn soft_shutdown_token(&self) -> CancellationToken {
        self.soft_shutdown_token.clone()
    }

    /// Run until the process is ready to exit.
    pub async fn run(mut self) {
        // Wait for a first signal and trigger the graceful shutdown
        tokio::select! {
            _ = self.sigterm.recv() => {
                tracing::info!("Shutdown signal received (SIGTERM), shutting down");
            },
            _ = self.sigint.recv() => {
                tracing::info!("Shutdown signal received (SIGINT), shutting down");
            },
        };

        self.soft_shutdown_token.cancel();
        self.task_tracker.close();

        // Wait for the tracked tasks to finish, unless a second signal or
        // the timeout asks for an immediate stop
        tokio::select! {
            _ = self.sigterm.recv() => {
                tracing::warn!("Second shutdown signal received (SIGTERM), exiting immediately");
            },
            _ = self.sigint.recv() => {
                tracing::warn!("Second shutdown signal received (SIGINT), exiting immediately");
            },
            () = tokio::time::sleep(SHUTDOWN_TIMEOUT) => {
                tracing::warn!("Shutdown timeout reached, exiting immediately");
            },
            () = self.task_tracker.wait() => {
                tracing::info!("All tasks are done, exiting");
            },
        }
    }
}
