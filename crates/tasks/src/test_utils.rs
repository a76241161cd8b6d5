// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::sync::Arc;

use nudge_data_model::{Clock, MockClock, Profile};
use nudge_push::MockPushGateway;
use nudge_storage_mem::MemRepositoryFactory;
use ulid::Ulid;

use crate::State;

pub(crate) fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub(crate) fn profile(clock: &MockClock, email: &str, tokens: &[&str]) -> Profile {
    Profile {
        id: Ulid::new(),
        email: format!("{email}@example.com"),
        name: email.to_owned(),
        fcm_tokens: tokens.iter().map(|t| (*t).to_owned()).collect(),
        created_at: clock.now(),
    }
}

pub(crate) fn state_with(factory: &MemRepositoryFactory, push: Arc<MockPushGateway>) -> State {
    setup();
    State::new(
        Arc::new(factory.clone()),
        push,
        MockClock::default(),
        nudge_config::NotificationsConfig::default(),
    )
}
