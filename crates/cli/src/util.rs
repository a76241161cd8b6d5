// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::time::Duration;

use nudge_config::{IdentityConfig, PushConfig};
use nudge_firebase::{FcmGateway, FirebaseAuth};

/// Build the HTTP client shared by the outgoing service connections
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("nudge/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()
}

pub fn identity_provider_from_config(
    config: &IdentityConfig,
    http_client: reqwest::Client,
) -> FirebaseAuth {
    FirebaseAuth::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        http_client,
    )
}

pub fn push_gateway_from_config(config: &PushConfig, http_client: reqwest::Client) -> FcmGateway {
    FcmGateway::new(
        config.endpoint.clone(),
        config.server_key.clone(),
        http_client,
    )
}
