// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ulid::Ulid;

/// A user profile document, keyed by the identity provider's issued id.
///
/// The profile is created together with the identity at provisioning time and
/// is never deleted by this service. `fcm_tokens` is mutated by the token
/// cleanup job (removal) and by client-side registration flows (addition,
/// outside this service). Token order is preserved; uniqueness is not
/// enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: Ulid,
    pub email: String,
    pub name: String,
    pub fcm_tokens: Vec<String>,
    pub created_at: DateTime<Utc>,
}
