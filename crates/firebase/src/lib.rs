// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Firebase-backed implementations of the identity provider and push
//! gateway abstractions: the Identity Toolkit REST API for account
//! creation, and the FCM legacy HTTP API for multicast sends.

#![allow(clippy::module_name_repetitions)]

mod auth;
mod error;
mod fcm;

pub use self::{auth::FirebaseAuth, fcm::FcmGateway};
