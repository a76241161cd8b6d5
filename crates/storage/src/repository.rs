// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use async_trait::async_trait;
use thiserror::Error;

use crate::{WriteBatch, profile::ProfileRepository};

/// The error type returned by [`BoxRepository`] methods, which hides the
/// backend-specific error type
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RepositoryError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl RepositoryError {
    /// Construct a [`RepositoryError`] out of another error
    pub fn from_error<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }
}

/// Access the various repositories the backend implements.
pub trait RepositoryAccess: Send {
    /// The backend-specific error type used by each repository.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get a [`ProfileRepository`]
    fn profile<'c>(&'c mut self) -> Box<dyn ProfileRepository<Error = Self::Error> + 'c>;

    /// Open a new [`WriteBatch`]
    ///
    /// The batch is independent of this repository instance: it can be held
    /// while other repositories are used, and staged mutations only become
    /// visible once the batch is committed.
    fn batch(&mut self) -> Box<dyn WriteBatch<Error = Self::Error>>;
}

/// A type-erased [`RepositoryAccess`], with the error type mapped to
/// [`RepositoryError`]
pub type BoxRepository = Box<dyn RepositoryAccess<Error = RepositoryError> + Send + 'static>;

/// A factory which can create new [`BoxRepository`] instances
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Create a new [`BoxRepository`]
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryError`] if the backend is unreachable
    async fn create(&self) -> Result<BoxRepository, RepositoryError>;
}

/// A boxed, shareable [`RepositoryFactory`]
pub type BoxRepositoryFactory = std::sync::Arc<dyn RepositoryFactory + Send + Sync + 'static>;

impl<R, F, E> RepositoryAccess for crate::MapErr<R, F>
where
    R: RepositoryAccess,
    F: FnMut(R::Error) -> E + Clone + Send + Sync + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn profile<'c>(&'c mut self) -> Box<dyn ProfileRepository<Error = Self::Error> + 'c> {
        Box::new(crate::MapErr::new(self.inner.profile(), &mut self.mapper))
    }

    fn batch(&mut self) -> Box<dyn WriteBatch<Error = Self::Error>> {
        Box::new(crate::MapErr::new(self.inner.batch(), self.mapper.clone()))
    }
}
