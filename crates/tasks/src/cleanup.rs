// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use nudge_storage::{ProfileRepository as _, RepositoryAccess as _, WriteBatch as _};
use tracing::{debug, info};

use crate::{State, TaskError};

/// Remove dead device tokens from every profile still referencing them
///
/// Lookups run one token at a time; the removals are staged into a single
/// batch, so readers never observe a half-applied cleanup. When no profile
/// references any of the tokens, no write is issued at all.
#[tracing::instrument(name = "task.cleanup_tokens", skip_all, fields(tokens = tokens.len()))]
pub async fn cleanup_tokens(state: &State, tokens: &[String]) -> Result<(), TaskError> {
    let mut repo = state.repository().await?;
    let mut batch = repo.batch();

    for token in tokens {
        for holder in repo.profile().find_by_token(token).await? {
            batch.remove_token(holder.id, token);
        }
    }

    if batch.is_empty() {
        debug!("no profile references a dead token");
        return Ok(());
    }

    let count = batch.len();
    batch.commit().await?;
    info!(count, "removed dead tokens");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nudge_data_model::MockClock;
    use nudge_push::MockPushGateway;
    use nudge_storage_mem::MemRepositoryFactory;

    use super::*;
    use crate::test_utils::{profile, state_with};

    #[tokio::test]
    async fn test_shared_token_is_removed_from_every_holder() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        factory.insert_profile(profile(&clock, "alice", &["dead", "kept"]));
        factory.insert_profile(profile(&clock, "bob", &["dead"]));

        let state = state_with(&factory, Arc::new(MockPushGateway::new()));
        cleanup_tokens(&state, &["dead".to_owned()]).await.unwrap();

        let tokens: Vec<Vec<String>> = factory
            .profiles()
            .into_iter()
            .map(|p| p.fcm_tokens)
            .collect();
        assert_eq!(tokens, [vec!["kept".to_owned()], vec![]]);
    }

    #[tokio::test]
    async fn test_no_holder_means_no_write() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        factory.insert_profile(profile(&clock, "alice", &["kept"]));

        // If the cleanup issued a commit, this would make it fail
        factory.fail_next_commit();

        let state = state_with(&factory, Arc::new(MockPushGateway::new()));
        cleanup_tokens(&state, &["absent".to_owned()]).await.unwrap();

        assert_eq!(factory.profiles()[0].fcm_tokens, &["kept"]);
    }

    #[tokio::test]
    async fn test_empty_token_list_queries_and_writes_nothing() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        factory.insert_profile(profile(&clock, "alice", &["kept"]));

        // If the cleanup issued a commit, this would make it fail
        factory.fail_next_commit();

        let state = state_with(&factory, Arc::new(MockPushGateway::new()));
        cleanup_tokens(&state, &[]).await.unwrap();

        // Not a single document query was made and nothing was written
        assert_eq!(factory.token_query_count(), 0);
        assert_eq!(factory.profiles()[0].fcm_tokens, &["kept"]);
    }

    #[tokio::test]
    async fn test_failed_commit_surfaces_as_an_error() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        factory.insert_profile(profile(&clock, "alice", &["dead"]));
        factory.fail_next_commit();

        let state = state_with(&factory, Arc::new(MockPushGateway::new()));
        cleanup_tokens(&state, &["dead".to_owned()])
            .await
            .unwrap_err();

        // The removal was not applied
        assert_eq!(factory.profiles()[0].fcm_tokens, &["dead"]);
    }
}
