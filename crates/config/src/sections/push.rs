// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigurationSection;

fn default_endpoint() -> Url {
    Url::parse("https://fcm.googleapis.com/").unwrap()
}

/// Configuration related to the push gateway
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushConfig {
    /// The base URL of the push gateway
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// The server key used to authenticate sends
    pub server_key: String,
}

impl ConfigurationSection for PushConfig {
    const PATH: Option<&'static str> = Some("push");
}

impl PushConfig {
    pub(crate) fn test() -> Self {
        Self {
            endpoint: default_endpoint(),
            server_key: "test-server-key".to_owned(),
        }
    }
}
