// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Domain types shared by every crate in the workspace.
//!
//! This crate also defines the [`Clock`] trait used to abstract the way the
//! current time is retrieved. It has two implementations: [`SystemClock`]
//! which uses the system time, and [`MockClock`] which is useful for testing.

#![allow(clippy::module_name_repetitions)]

pub mod clock;
mod notification;
mod profile;

pub use self::{
    clock::{Clock, MockClock, SystemClock},
    notification::NotificationPayload,
    profile::Profile,
};
