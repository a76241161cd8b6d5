// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::fmt::Display;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// The error envelope of the Firebase REST APIs
/// Ref: <https://firebase.google.com/docs/reference/rest/auth#section-error-format>
#[derive(Debug, Deserialize)]
struct FirebaseError {
    error: FirebaseErrorBody,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    message: String,
}

/// Represents an error received from Firebase.
/// Where possible, we capture the error code from the JSON response body.
#[derive(Debug, Error)]
pub(crate) struct Error {
    firebase_error: Option<FirebaseError>,

    #[source]
    source: reqwest::Error,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(firebase_error) = &self.firebase_error {
            write!(f, "{}", firebase_error.error.message)
        } else {
            write!(f, "(no specific error)")
        }
    }
}

impl Error {
    /// Return the error code, which Firebase sends as the first word of the
    /// error message (e.g. `EMAIL_EXISTS`)
    pub fn errcode(&self) -> Option<&str> {
        let fe = self.firebase_error.as_ref()?;
        let code = fe
            .error
            .message
            .split_whitespace()
            .next()
            .unwrap_or(&fe.error.message);
        Some(code)
    }

    /// The full error message from the response body
    pub fn message(&self) -> Option<&str> {
        let fe = self.firebase_error.as_ref()?;
        Some(&fe.error.message)
    }
}

/// An extension trait for [`reqwest::Response`] to help working with errors
/// from Firebase.
#[async_trait]
pub(crate) trait FirebaseResponseExt: Sized {
    async fn error_for_firebase_error(self) -> Result<Self, Error>;
}

#[async_trait]
impl FirebaseResponseExt for reqwest::Response {
    async fn error_for_firebase_error(self) -> Result<Self, Error> {
        match self.error_for_status_ref() {
            Ok(_response) => Ok(self),
            Err(source) => {
                let firebase_error = self.json().await.ok();
                Err(Error {
                    firebase_error,
                    source,
                })
            }
        }
    }
}
