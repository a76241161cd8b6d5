// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! A mock implementation of the [`IdentityProvider`] trait, which never
//! leaves the process. Useful for tests.

use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use rand::SeedableRng;
use ulid::Ulid;

use crate::{CreatedIdentity, IdentityError};

/// The error code reported on duplicate registrations, matching the
/// upstream provider's
pub const EMAIL_EXISTS: &str = "EMAIL_EXISTS";

/// A mock identity provider registering identities in memory
pub struct IdentityProvider {
    emails: Mutex<HashSet<String>>,
    rng: Mutex<rand_chacha::ChaChaRng>,
    calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl IdentityProvider {
    /// Create a new mock provider with no registered identity
    #[must_use]
    pub fn new() -> Self {
        Self {
            emails: Mutex::new(HashSet::new()),
            rng: Mutex::new(rand_chacha::ChaChaRng::seed_from_u64(42)),
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    /// How many times [`IdentityProvider::create_identity`] was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next [`IdentityProvider::create_identity`] call fail with a
    /// transport error
    pub fn fail_next_create(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::IdentityProvider for IdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<CreatedIdentity, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(IdentityError::Transport(anyhow::anyhow!(
                "connection reset by peer"
            )));
        }

        let mut emails = self.emails.lock().unwrap();
        if !emails.insert(email.to_owned()) {
            return Err(IdentityError::Provider {
                code: EMAIL_EXISTS.to_owned(),
                message: format!("The email address {email} is already in use"),
            });
        }

        let mut rng = self.rng.lock().unwrap();
        Ok(CreatedIdentity {
            id: Ulid::with_source(&mut *rng),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::IdentityProvider as _;

    #[tokio::test]
    async fn test_mock_provider() {
        let provider = IdentityProvider::new();
        assert_eq!(provider.call_count(), 0);

        let created = provider
            .create_identity("alice@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 1);

        // Same email a second time reports the provider error code
        let err = provider
            .create_identity("alice@example.com", "hunter2")
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(EMAIL_EXISTS));

        // A different email gets a different id
        let other = provider
            .create_identity("bob@example.com", "hunter2")
            .await
            .unwrap();
        assert_ne!(created.id, other.id);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_transport_errors_have_no_code() {
        let err = IdentityError::Transport(anyhow::anyhow!("connection refused"));
        assert_matches!(err.code(), None);
    }
}
