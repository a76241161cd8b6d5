// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Repository to interact with the profile collection

use async_trait::async_trait;
use nudge_data_model::{Clock, Profile};
use ulid::Ulid;

use crate::MapErr;

/// A [`ProfileRepository`] helps interacting with [`Profile`] documents saved
/// in the storage backend
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The error type returned by the repository
    type Error;

    /// Lookup a [`Profile`] by its ID
    ///
    /// Returns `None` if no [`Profile`] was found
    ///
    /// # Parameters
    ///
    /// * `id`: The ID of the [`Profile`] to lookup
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying repository fails
    async fn lookup(&mut self, id: Ulid) -> Result<Option<Profile>, Self::Error>;

    /// Create a new [`Profile`] at provisioning time
    ///
    /// Returns the newly-created [`Profile`]. The profile starts with an
    /// empty token collection; tokens are registered later by the mobile
    /// clients.
    ///
    /// # Parameters
    ///
    /// * `clock`: The clock used to record the creation time
    /// * `id`: The ID issued by the identity provider
    /// * `email`: The email address of the user
    /// * `name`: The display name of the user
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying repository fails, or if a
    /// profile with that ID already exists
    async fn add(
        &mut self,
        clock: &dyn Clock,
        id: Ulid,
        email: String,
        name: String,
    ) -> Result<Profile, Self::Error>;

    /// List every [`Profile`] in the collection, in insertion order
    ///
    /// This is an unbounded scan: it is acceptable while the collection
    /// stays small, and should be replaced by paginated retrieval before
    /// the user base grows.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying repository fails
    async fn all(&mut self) -> Result<Vec<Profile>, Self::Error>;

    /// Find every [`Profile`] whose token collection contains the given
    /// token
    ///
    /// A token is expected to appear in at most one profile, but this is
    /// not enforced, so this returns a list.
    ///
    /// # Parameters
    ///
    /// * `token`: The push token to search for
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the underlying repository fails
    async fn find_by_token(&mut self, token: &str) -> Result<Vec<Profile>, Self::Error>;
}

#[async_trait]
impl<R: ProfileRepository + ?Sized> ProfileRepository for Box<R> {
    type Error = R::Error;

    async fn lookup(&mut self, id: Ulid) -> Result<Option<Profile>, Self::Error> {
        (**self).lookup(id).await
    }

    async fn add(
        &mut self,
        clock: &dyn Clock,
        id: Ulid,
        email: String,
        name: String,
    ) -> Result<Profile, Self::Error> {
        (**self).add(clock, id, email, name).await
    }

    async fn all(&mut self) -> Result<Vec<Profile>, Self::Error> {
        (**self).all().await
    }

    async fn find_by_token(&mut self, token: &str) -> Result<Vec<Profile>, Self::Error> {
        (**self).find_by_token(token).await
    }
}

#[async_trait]
impl<R, F, E> ProfileRepository for MapErr<R, F>
where
    R: ProfileRepository,
    F: FnMut(R::Error) -> E + Send + Sync,
{
    type Error = E;

    async fn lookup(&mut self, id: Ulid) -> Result<Option<Profile>, Self::Error> {
        self.inner.lookup(id).await.map_err(&mut self.mapper)
    }

    async fn add(
        &mut self,
        clock: &dyn Clock,
        id: Ulid,
        email: String,
        name: String,
    ) -> Result<Profile, Self::Error> {
        self.inner
            .add(clock, id, email, name)
            .await
            .map_err(&mut self.mapper)
    }

    async fn all(&mut self) -> Result<Vec<Profile>, Self::Error> {
        self.inner.all().await.map_err(&mut self.mapper)
    }

    async fn find_by_token(&mut self, token: &str) -> Result<Vec<Profile>, Self::Error> {
        self.inner
            .find_by_token(token)
            .await
            .map_err(&mut self.mapper)
    }
}
