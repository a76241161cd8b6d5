// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use nudge_data_model::{Clock as _, NotificationPayload};
use nudge_push::PushGateway as _;
use nudge_storage::{ProfileRepository as _, RepositoryAccess as _};
use tracing::{info, warn};

use crate::{State, TaskError, cleanup_tokens};

/// Send the daily reminder to every registered device, then clean up the
/// tokens the gateway reported as dead.
///
/// Tokens are gathered in document scan order, duplicates included: the
/// gateway reports outcomes positionally, so any reordering or deduplication
/// would misattribute failures.
#[tracing::instrument(name = "task.daily_reminder", skip_all)]
pub async fn daily_reminder(state: &State) -> Result<(), TaskError> {
    let mut repo = state.repository().await?;
    let profiles = repo.profile().all().await?;

    let tokens: Vec<String> = profiles
        .iter()
        .flat_map(|profile| profile.fcm_tokens.iter().cloned())
        .collect();

    if tokens.is_empty() {
        info!("no registered device token, skipping dispatch");
        return Ok(());
    }

    let notifications = state.notifications();
    let payload = NotificationPayload::daily_reminder(
        &notifications.title,
        &notifications.body,
        state.clock().now(),
        tokens,
    );

    let summary = state.push().send_multicast(&payload).await?;
    info!(
        success = summary.success_count,
        failure = summary.failure_count,
        "dispatched daily reminder"
    );

    if summary.failure_count > 0 {
        let mut dead = Vec::with_capacity(summary.failure_count);
        for (token, error) in summary.failed_tokens(&payload.tokens) {
            warn!(token, error, "gateway rejected token");
            dead.push(token.to_owned());
        }

        cleanup_tokens(state, &dead).await?;
    }

    Ok(())
}
