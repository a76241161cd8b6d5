// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::time::Duration;

use nudge_data_model::Clock as _;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::State;

/// Run the scheduler loop until the cancellation token fires
///
/// Each occurrence of the configured cron schedule triggers one dispatch.
/// Failures are logged and swallowed; a failed or missed run is not retried,
/// the next attempt happens at the next occurrence.
pub async fn run_worker(state: State, cancellation_token: CancellationToken) {
    let schedule = state.notifications().schedule();
    let tz = state.notifications().timezone();

    loop {
        let now = state.clock().now().with_timezone(&tz);
        let Some(next) = schedule.after(&now).next() else {
            error!("schedule has no future occurrence, stopping worker");
            return;
        };

        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        debug!(next = %next, "waiting for the next scheduled dispatch");

        tokio::select! {
            () = cancellation_token.cancelled() => {
                info!("worker shutting down");
                return;
            }
            () = tokio::time::sleep(wait) => {}
        }

        if let Err(e) = crate::daily_reminder(&state).await {
            error!(error = %e, "daily reminder dispatch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nudge_data_model::MockClock;
    use nudge_push::MockPushGateway;
    use nudge_storage_mem::MemRepositoryFactory;

    use super::*;
    use crate::test_utils::state_with;

    #[tokio::test]
    async fn test_cancellation_stops_the_worker() {
        let factory = MemRepositoryFactory::new();
        let push = Arc::new(MockPushGateway::new());
        let state = state_with(&factory, Arc::clone(&push));

        let cancellation_token = CancellationToken::new();
        cancellation_token.cancel();

        tokio::time::timeout(
            Duration::from_secs(5),
            run_worker(state, cancellation_token),
        )
        .await
        .unwrap();

        // Nothing was dispatched
        assert!(push.sent().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_errors_do_not_stop_the_worker() {
        crate::test_utils::setup();
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        factory.insert_profile(crate::test_utils::profile(&clock, "alice", &["token-1"]));

        let push = Arc::new(MockPushGateway::new());
        push.fail_next_send();

        // Every second, so the test observes several runs quickly
        let notifications = nudge_config::NotificationsConfig {
            schedule: "* * * * * *".to_owned(),
            ..nudge_config::NotificationsConfig::default()
        };
        let state = crate::State::new(
            Arc::new(factory.clone()),
            Arc::clone(&push),
            clock,
            notifications,
        );

        let cancellation_token = CancellationToken::new();
        let handle = tokio::spawn(run_worker(state, cancellation_token.clone()));

        // The first dispatch fails; the worker keeps scheduling until one
        // goes through. Failed calls are not recorded by the mock, so a
        // recorded send proves the worker survived the failure.
        tokio::time::timeout(Duration::from_secs(30), async {
            while push.sent().is_empty() {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        })
        .await
        .unwrap();

        cancellation_token.cancel();
        handle.await.unwrap();
    }
}
