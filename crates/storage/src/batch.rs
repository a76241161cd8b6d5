// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Atomic write batches
//!
//! A [`WriteBatch`] accumulates mutations without suspending, and applies
//! all of them together when committed. The commit is all-or-nothing: if it
//! fails, the store is left unchanged.

use async_trait::async_trait;
use ulid::Ulid;

use crate::MapErr;

/// A deferred set of mutations, applied atomically on commit
///
/// Dropping a batch without committing it discards every staged mutation.
#[async_trait]
pub trait WriteBatch: Send {
    /// The error type returned when committing the batch
    type Error;

    /// Stage the removal of one token value from one profile's token
    /// collection
    ///
    /// The removal is idempotent: removing a value which is not present, or
    /// targeting a profile which no longer exists, is a no-op for that
    /// document at commit time.
    ///
    /// # Parameters
    ///
    /// * `profile_id`: The ID of the profile document to update
    /// * `token`: The token value to remove
    fn remove_token(&mut self, profile_id: Ulid, token: &str);

    /// The number of mutations staged so far
    fn len(&self) -> usize;

    /// Whether no mutation has been staged yet
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply every staged mutation, atomically
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying backend fails. On error,
    /// none of the staged mutations have been applied.
    async fn commit(self: Box<Self>) -> Result<(), Self::Error>;
}

/// A boxed [`WriteBatch`], type-erased over the storage backend
pub type BoxWriteBatch = Box<dyn WriteBatch<Error = crate::RepositoryError>>;

#[async_trait]
impl<B: WriteBatch + ?Sized> WriteBatch for Box<B> {
    type Error = B::Error;

    fn remove_token(&mut self, profile_id: Ulid, token: &str) {
        (**self).remove_token(profile_id, token);
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    async fn commit(self: Box<Self>) -> Result<(), Self::Error> {
        (*self).commit().await
    }
}

#[async_trait]
impl<B, F, E> WriteBatch for MapErr<B, F>
where
    B: WriteBatch,
    F: FnMut(B::Error) -> E + Send + Sync,
{
    type Error = E;

    fn remove_token(&mut self, profile_id: Ulid, token: &str) {
        self.inner.remove_token(profile_id, token);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), Self::Error> {
        let this = *self;
        let inner = this.inner;
        let mut mapper = this.mapper;
        Box::new(inner).commit().await.map_err(&mut mapper)
    }
}
