// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Interactions with the document store
//!
//! This crate provides a set of traits that can be implemented to interact
//! with the profile collection. Those traits are called repositories.
//!
//! Each repository can be accessed via the [`RepositoryAccess`] trait. This
//! trait can be wrapped in a [`BoxRepository`] to allow using it without
//! caring about the underlying storage backend, and without carrying around
//! the generic type parameter.
//!
//! Mutations of the token collections go through a [`WriteBatch`]:
//! mutations are staged synchronously, and applied all together, atomically,
//! when the batch is committed. A batch which is dropped without being
//! committed leaves the store unchanged.
//!
//! # Defining a new repository
//!
//! To define a new repository, you have to:
//!   1. Define a new (async) repository trait, with the methods you need
//!   2. Write an implementation of this trait for each storage backend you
//!      want (currently only for `nudge-storage-mem`)
//!   3. Make it accessible via the [`RepositoryAccess`] trait
//!
//! Three things to note with repository implementations:
//!
//!   1. They define an associated error type, and all methods are fallible,
//!      and use that error type
//!   2. Lookups return a `Result<Option<T>, Self::Error>`, because 'not
//!      found' errors are usually cases that are handled differently
//!   3. All the methods use an `&mut self`. This ensures only one operation
//!      is done at a time on a single repository instance.

#![deny(clippy::future_not_send)]
#![allow(clippy::module_name_repetitions)]

mod batch;
pub mod profile;
pub(crate) mod repository;
mod utils;

pub use self::{
    batch::{BoxWriteBatch, WriteBatch},
    profile::ProfileRepository,
    repository::{
        BoxRepository, BoxRepositoryFactory, RepositoryAccess, RepositoryError, RepositoryFactory,
    },
    utils::MapErr,
};
