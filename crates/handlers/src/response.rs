// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use serde::Serialize;

/// The body returned by every failing endpoint. Clients dispatch on the
/// `kind` field and surface the `message`; `metadata` carries kind-specific
/// context, like the provider error code on conflicts.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    kind: &'static str,
    message: String,
    metadata: BTreeMap<&'static str, String>,
}

impl ErrorResponse {
    pub(crate) fn new(kind: &'static str, message: String) -> Self {
        Self {
            kind,
            message,
            metadata: BTreeMap::new(),
        }
    }

    pub(crate) fn with_metadata(mut self, key: &'static str, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}
