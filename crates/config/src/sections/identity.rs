// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigurationSection;

fn default_endpoint() -> Url {
    Url::parse("https://identitytoolkit.googleapis.com/").unwrap()
}

/// Configuration related to the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IdentityConfig {
    /// The base URL of the identity provider's REST API
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// The API key used to authenticate calls
    pub api_key: String,
}

impl ConfigurationSection for IdentityConfig {
    const PATH: Option<&'static str> = Some("identity");
}

impl IdentityConfig {
    pub(crate) fn test() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: "test-api-key".to_owned(),
        }
    }
}
