// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! An in-memory implementation of the repositories defined in
//! [`nudge_storage`]
//!
//! The whole profile collection lives behind one [`RwLock`]. Write batches
//! stage their mutations without touching the lock, and apply all of them
//! under a single write-lock acquisition on commit, so readers never observe
//! a partially applied batch.

#![allow(clippy::module_name_repetitions)]

mod batch;
mod profile;
mod repository;

pub use self::{
    batch::MemWriteBatch,
    profile::MemProfileRepository,
    repository::{MemRepository, MemRepositoryFactory},
};

use std::sync::{
    RwLock,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use nudge_data_model::Profile;
use thiserror::Error;

/// The error type returned by the in-memory backend
#[derive(Debug, Error)]
pub enum MemStoreError {
    /// A profile with the same ID already exists
    #[error("profile {id} already exists")]
    ProfileExists {
        /// The conflicting profile ID
        id: ulid::Ulid,
    },

    /// A commit failure injected through
    /// [`MemRepositoryFactory::fail_next_commit`]
    #[error("injected commit failure")]
    CommitFailed,
}

/// The shared state behind every repository handed out by a
/// [`MemRepositoryFactory`]
#[derive(Default)]
pub(crate) struct Store {
    /// Profiles in insertion order, which is the document iteration order
    /// of the collection
    profiles: RwLock<Vec<Profile>>,

    /// When set, the next batch commit fails with
    /// [`MemStoreError::CommitFailed`] without applying anything
    fail_next_commit: AtomicBool,

    /// How many token queries have hit the store
    token_queries: AtomicUsize,
}

impl Store {
    pub(crate) fn take_commit_fault(&self) -> bool {
        self.fail_next_commit.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn arm_commit_fault(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub(crate) fn profiles(&self) -> &RwLock<Vec<Profile>> {
        &self.profiles
    }

    pub(crate) fn count_token_query(&self) {
        self.token_queries.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn token_queries(&self) -> usize {
        self.token_queries.load(Ordering::SeqCst)
    }
}
