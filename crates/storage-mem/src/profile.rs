// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::sync::Arc;

use async_trait::async_trait;
use nudge_data_model::{Clock, Profile};
use nudge_storage::ProfileRepository;
use ulid::Ulid;

use crate::{MemStoreError, Store};

/// An implementation of [`ProfileRepository`] backed by the in-memory store
pub struct MemProfileRepository {
    store: Arc<Store>,
}

impl MemProfileRepository {
    pub(crate) fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProfileRepository for MemProfileRepository {
    type Error = MemStoreError;

    async fn lookup(&mut self, id: Ulid) -> Result<Option<Profile>, Self::Error> {
        let profiles = self
            .store
            .profiles()
            .read()
            .expect("profile store lock poisoned");

        Ok(profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn add(
        &mut self,
        clock: &dyn Clock,
        id: Ulid,
        email: String,
        name: String,
    ) -> Result<Profile, Self::Error> {
        let mut profiles = self
            .store
            .profiles()
            .write()
            .expect("profile store lock poisoned");

        if profiles.iter().any(|p| p.id == id) {
            return Err(MemStoreError::ProfileExists { id });
        }

        let profile = Profile {
            id,
            email,
            name,
            fcm_tokens: Vec::new(),
            created_at: clock.now(),
        };
        profiles.push(profile.clone());

        Ok(profile)
    }

    async fn all(&mut self) -> Result<Vec<Profile>, Self::Error> {
        let profiles = self
            .store
            .profiles()
            .read()
            .expect("profile store lock poisoned");

        Ok(profiles.clone())
    }

    async fn find_by_token(&mut self, token: &str) -> Result<Vec<Profile>, Self::Error> {
        self.store.count_token_query();
        let profiles = self
            .store
            .profiles()
            .read()
            .expect("profile store lock poisoned");

        Ok(profiles
            .iter()
            .filter(|p| p.fcm_tokens.iter().any(|t| t == token))
            .cloned()
            .collect())
    }
}
