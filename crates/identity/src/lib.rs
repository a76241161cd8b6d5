// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Abstraction over the upstream identity provider
//!
//! The provider owns email format checks, password strength rules and email
//! uniqueness; this crate only models the call and the shape of its
//! failures.

mod mock;

use std::sync::Arc;

use ulid::Ulid;

pub use self::mock::IdentityProvider as MockIdentityProvider;

/// A newly registered identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIdentity {
    /// The unique id issued by the provider, which keys the profile
    /// document
    pub id: Ulid,
}

/// An error reported by the identity provider
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider rejected the request with a provider-specific error
    /// code, e.g. `EMAIL_EXISTS`
    #[error("{code}: {message}")]
    Provider {
        /// The provider-specific error code
        code: String,
        /// The human-readable message sent along the code
        message: String,
    },

    /// The provider could not be reached, or replied with something we
    /// could not make sense of
    #[error("identity provider unreachable")]
    Transport(#[source] anyhow::Error),
}

impl IdentityError {
    /// The provider-specific error code, if the provider sent one
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Provider { code, .. } => Some(code),
            Self::Transport(_) => None,
        }
    }
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new identity with the given email and password.
    ///
    /// # Parameters
    ///
    /// * `email` - The email address of the account to create.
    /// * `password` - The password of the account to create.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or rejected the
    /// registration; provider-side rejections carry the provider error
    /// code.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedIdentity, IdentityError>;
}

#[async_trait::async_trait]
impl<T: IdentityProvider + Send + Sync + ?Sized> IdentityProvider for &T {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedIdentity, IdentityError> {
        (**self).create_identity(email, password).await
    }
}

#[async_trait::async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedIdentity, IdentityError> {
        (**self).create_identity(email, password).await
    }
}
