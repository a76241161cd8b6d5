// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use anyhow::Context as _;
use nudge_identity::{CreatedIdentity, IdentityError, IdentityProvider};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use url::Url;
use uuid::Uuid;

use crate::error::FirebaseResponseExt as _;

/// An [`IdentityProvider`] backed by the Firebase Auth REST API
#[derive(Clone)]
pub struct FirebaseAuth {
    endpoint: Url,
    api_key: String,
    http_client: reqwest::Client,
}

impl FirebaseAuth {
    #[must_use]
    pub fn new(endpoint: Url, api_key: String, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            api_key,
            http_client,
        }
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, IdentityError> {
        let url = self
            .endpoint
            .join(path)
            .context("Invalid identity provider endpoint")
            .map_err(IdentityError::Transport)?;

        Ok(self
            .http_client
            .post(url)
            .query(&[("key", &self.api_key)]))
    }
}

/// The UUIDv5 namespace under which provider account ids are hashed
const ACCOUNT_NAMESPACE: Uuid = Uuid::from_u128(0x46d2_e1fa_bd8e_58a3_a92f_04aa_53f5_028e);

/// Derive a stable ULID from the opaque account id issued by Firebase, so
/// profile documents are keyed uniformly across backends.
///
/// The derivation is the RFC 4122 UUIDv5 digest of the provider id under a
/// fixed namespace. Profile documents are durable, so the mapping must not
/// depend on anything a toolchain or release upgrade can change.
fn ulid_from_local_id(local_id: &str) -> Ulid {
    Ulid::from(Uuid::new_v5(&ACCOUNT_NAMESPACE, local_id.as_bytes()).as_u128())
}

#[async_trait::async_trait]
impl IdentityProvider for FirebaseAuth {
    #[tracing::instrument(
        name = "identity.create",
        skip_all,
        fields(identity.email = email),
        err(Debug),
    )]
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedIdentity, IdentityError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Request<'a> {
            email: &'a str,
            password: &'a str,
            return_secure_token: bool,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            local_id: String,
        }

        let response = self
            .post("v1/accounts:signUp")?
            .json(&Request {
                email,
                password,
                return_secure_token: false,
            })
            .send()
            .await
            .context("Failed to reach the identity provider")
            .map_err(IdentityError::Transport)?;

        let response = match response.error_for_firebase_error().await {
            Ok(response) => response,
            Err(e) => {
                // The provider sends its rejection reason as an error code
                // in the response body; surface it when it's there
                if let Some(code) = e.errcode() {
                    return Err(IdentityError::Provider {
                        code: code.to_owned(),
                        message: e.message().unwrap_or(code).to_owned(),
                    });
                }
                return Err(IdentityError::Transport(
                    anyhow::Error::new(e).context("Unexpected identity provider response"),
                ));
            }
        };

        let body: Response = response
            .json()
            .await
            .context("Failed to deserialize identity provider response")
            .map_err(IdentityError::Transport)?;

        Ok(CreatedIdentity {
            id: ulid_from_local_id(&body.local_id),
        })
    }
}
