// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::sync::Arc;

use async_trait::async_trait;
use nudge_storage::{
    BoxRepository, MapErr, ProfileRepository, RepositoryAccess, RepositoryError,
    RepositoryFactory, WriteBatch,
};

use crate::{MemProfileRepository, MemStoreError, MemWriteBatch, Store};

/// A factory handing out repositories over one shared in-memory store
///
/// Cloning the factory shares the underlying collection.
#[derive(Clone, Default)]
pub struct MemRepositoryFactory {
    store: Arc<Store>,
}

impl MemRepositoryFactory {
    /// Create a new, empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a concrete repository over this store
    #[must_use]
    pub fn repository(&self) -> MemRepository {
        MemRepository {
            store: Arc::clone(&self.store),
        }
    }

    /// Make the next batch commit fail, without applying anything
    ///
    /// This is used in tests to exercise the all-or-nothing commit
    /// behaviour.
    pub fn fail_next_commit(&self) {
        self.store.arm_commit_fault();
    }

    /// Insert a full profile document, tokens included
    ///
    /// Token registration is done by the mobile clients directly against the
    /// document store, outside this service; tests and local tooling use
    /// this to stand in for that flow. Any existing document with the same
    /// ID is replaced.
    pub fn insert_profile(&self, profile: nudge_data_model::Profile) {
        let mut profiles = self
            .store
            .profiles()
            .write()
            .expect("profile store lock poisoned");
        profiles.retain(|p| p.id != profile.id);
        profiles.push(profile);
    }

    /// How many token queries have been issued against this store
    ///
    /// Tests use this to assert that a caller issued no lookups at all.
    #[must_use]
    pub fn token_query_count(&self) -> usize {
        self.store.token_queries()
    }

    /// Snapshot every profile document, in insertion order
    #[must_use]
    pub fn profiles(&self) -> Vec<nudge_data_model::Profile> {
        self.store
            .profiles()
            .read()
            .expect("profile store lock poisoned")
            .clone()
    }
}

#[async_trait]
impl RepositoryFactory for MemRepositoryFactory {
    async fn create(&self) -> Result<BoxRepository, RepositoryError> {
        Ok(self.repository().boxed())
    }
}

/// An implementation of [`RepositoryAccess`] backed by the in-memory store
pub struct MemRepository {
    store: Arc<Store>,
}

impl MemRepository {
    /// Type-erase this repository, mapping its error type to
    /// [`RepositoryError`]
    #[must_use]
    pub fn boxed(self) -> BoxRepository {
        Box::new(MapErr::new(self, map_error))
    }
}

fn map_error(error: MemStoreError) -> RepositoryError {
    RepositoryError::from_error(error)
}

impl RepositoryAccess for MemRepository {
    type Error = MemStoreError;

    fn profile<'c>(&'c mut self) -> Box<dyn ProfileRepository<Error = Self::Error> + 'c> {
        Box::new(MemProfileRepository::new(Arc::clone(&self.store)))
    }

    fn batch(&mut self) -> Box<dyn WriteBatch<Error = Self::Error>> {
        Box::new(MemWriteBatch::new(Arc::clone(&self.store)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use nudge_data_model::{Clock, MockClock};
    use ulid::Ulid;

    use super::*;

    /// Stand in for the client-side token registration flow
    fn seed_tokens(factory: &MemRepositoryFactory, id: Ulid, tokens: &[&str]) {
        let mut profiles = factory.store.profiles().write().unwrap();
        let profile = profiles.iter_mut().find(|p| p.id == id).unwrap();
        profile
            .fcm_tokens
            .extend(tokens.iter().map(|t| (*t).to_owned()));
    }

    #[tokio::test]
    async fn test_add_and_lookup() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        let id = Ulid::new();
        let profile = repo
            .profile()
            .add(&clock, id, "alice@example.com".to_owned(), "Alice".to_owned())
            .await
            .unwrap();
        assert_eq!(profile.id, id);
        assert_eq!(profile.created_at, clock.now());
        assert!(profile.fcm_tokens.is_empty());

        let found = repo.profile().lookup(id).await.unwrap().unwrap();
        assert_eq!(found, profile);

        // Adding the same id again fails
        let err = repo
            .profile()
            .add(&clock, id, "alice@example.com".to_owned(), "Alice".to_owned())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("profile {id} already exists"));
    }

    #[tokio::test]
    async fn test_scan_preserves_insertion_order() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        for n in 0..5 {
            repo.profile()
                .add(
                    &clock,
                    Ulid::new(),
                    format!("user{n}@example.com"),
                    format!("User {n}"),
                )
                .await
                .unwrap();
        }

        let all = repo.profile().all().await.unwrap();
        let emails: Vec<_> = all.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(
            emails,
            &[
                "user0@example.com",
                "user1@example.com",
                "user2@example.com",
                "user3@example.com",
                "user4@example.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_is_atomic_and_idempotent() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        let first = Ulid::new();
        let second = Ulid::new();
        repo.profile()
            .add(&clock, first, "a@example.com".to_owned(), "A".to_owned())
            .await
            .unwrap();
        repo.profile()
            .add(&clock, second, "b@example.com".to_owned(), "B".to_owned())
            .await
            .unwrap();
        seed_tokens(&factory, first, &["x", "y"]);
        seed_tokens(&factory, second, &["x"]);

        // Both profiles reference "x"; one batch removes it from both
        let mut batch = repo.batch();
        batch.remove_token(first, "x");
        batch.remove_token(second, "x");
        // Removing a token nobody holds must be a commit-time no-op
        batch.remove_token(first, "not-there");
        assert_eq!(batch.len(), 3);
        batch.commit().await.unwrap();

        let holders = repo.profile().find_by_token("x").await.unwrap();
        assert!(holders.is_empty());
        let survivor = repo.profile().lookup(first).await.unwrap().unwrap();
        assert_eq!(survivor.fcm_tokens, &["y"]);
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_store_unchanged() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        let id = Ulid::new();
        repo.profile()
            .add(&clock, id, "a@example.com".to_owned(), "A".to_owned())
            .await
            .unwrap();
        seed_tokens(&factory, id, &["x"]);

        factory.fail_next_commit();
        let mut batch = repo.batch();
        batch.remove_token(id, "x");
        batch.commit().await.unwrap_err();

        // The staged removal must not have been applied
        let profile = repo.profile().lookup(id).await.unwrap().unwrap();
        assert_eq!(profile.fcm_tokens, &["x"]);
    }

    #[tokio::test]
    async fn test_dropped_batch_is_discarded() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        let id = Ulid::new();
        repo.profile()
            .add(&clock, id, "a@example.com".to_owned(), "A".to_owned())
            .await
            .unwrap();
        seed_tokens(&factory, id, &["x"]);

        let mut batch = repo.batch();
        batch.remove_token(id, "x");
        drop(batch);

        let profile = repo.profile().lookup(id).await.unwrap().unwrap();
        assert_eq!(profile.fcm_tokens, &["x"]);
    }

    #[tokio::test]
    async fn test_find_by_token_matches_every_holder() {
        let factory = MemRepositoryFactory::new();
        let clock = MockClock::default();
        let mut repo = factory.create().await.unwrap();

        let first = Ulid::new();
        let second = Ulid::new();
        let third = Ulid::new();
        for (id, email) in [(first, "a"), (second, "b"), (third, "c")] {
            repo.profile()
                .add(&clock, id, format!("{email}@example.com"), email.to_owned())
                .await
                .unwrap();
        }
        seed_tokens(&factory, first, &["shared"]);
        seed_tokens(&factory, second, &["other"]);
        seed_tokens(&factory, third, &["shared"]);

        let holders = repo.profile().find_by_token("shared").await.unwrap();
        let ids: Vec<_> = holders.iter().map(|p| p.id).collect();
        assert_eq!(ids, &[first, third]);

        assert_matches!(repo.profile().find_by_token("absent").await, Ok(v) if v.is_empty());
        assert_eq!(factory.token_query_count(), 2);
    }
}
