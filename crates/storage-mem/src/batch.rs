// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::sync::Arc;

use async_trait::async_trait;
use nudge_storage::WriteBatch;
use ulid::Ulid;

use crate::{MemStoreError, Store};

enum BatchOp {
    /// Remove every occurrence of a token value from one profile's token
    /// collection
    RemoveToken { profile_id: Ulid, token: String },
}

/// A [`WriteBatch`] over the in-memory store
///
/// Mutations are staged in order and applied under one write-lock
/// acquisition on commit, which is what makes the batch atomic with respect
/// to readers.
pub struct MemWriteBatch {
    store: Arc<Store>,
    ops: Vec<BatchOp>,
}

impl MemWriteBatch {
    pub(crate) fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            ops: Vec::new(),
        }
    }
}

#[async_trait]
impl WriteBatch for MemWriteBatch {
    type Error = MemStoreError;

    fn remove_token(&mut self, profile_id: Ulid, token: &str) {
        self.ops.push(BatchOp::RemoveToken {
            profile_id,
            token: token.to_owned(),
        });
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), Self::Error> {
        if self.store.take_commit_fault() {
            return Err(MemStoreError::CommitFailed);
        }

        let mut profiles = self
            .store
            .profiles()
            .write()
            .expect("profile store lock poisoned");

        for op in &self.ops {
            match op {
                BatchOp::RemoveToken { profile_id, token } => {
                    // Removing from a document which no longer exists, or
                    // which doesn't hold the token, is a no-op
                    if let Some(profile) = profiles.iter_mut().find(|p| p.id == *profile_id) {
                        profile.fcm_tokens.retain(|t| t != token);
                    }
                }
            }
        }

        Ok(())
    }
}
