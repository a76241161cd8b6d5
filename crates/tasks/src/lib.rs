// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Background tasks: the daily reminder dispatch and the dead token cleanup
//! which follows it, plus the cron worker driving them.

use std::sync::Arc;

use nudge_config::NotificationsConfig;
use nudge_data_model::Clock;
use nudge_push::PushGateway;
use nudge_storage::{BoxRepository, BoxRepositoryFactory, RepositoryError, RepositoryFactory as _};

mod cleanup;
mod daily_reminder;
mod worker;

#[cfg(test)]
mod test_utils;

pub use self::{cleanup::cleanup_tokens, daily_reminder::daily_reminder, worker::run_worker};

/// Everything a task needs to run
#[derive(Clone)]
pub struct State {
    repository_factory: BoxRepositoryFactory,
    push: Arc<dyn PushGateway>,
    clock: Arc<dyn Clock + Send + Sync>,
    notifications: NotificationsConfig,
}

impl State {
    pub fn new(
        repository_factory: BoxRepositoryFactory,
        push: impl PushGateway + 'static,
        clock: impl Clock + Send + Sync + 'static,
        notifications: NotificationsConfig,
    ) -> Self {
        Self {
            repository_factory,
            push: Arc::new(push),
            clock: Arc::new(clock),
            notifications,
        }
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    pub(crate) fn push(&self) -> &dyn PushGateway {
        self.push.as_ref()
    }

    pub(crate) fn notifications(&self) -> &NotificationsConfig {
        &self.notifications
    }

    pub(crate) async fn repository(&self) -> Result<BoxRepository, RepositoryError> {
        self.repository_factory.create().await
    }
}

/// The error type shared by all the tasks
///
/// The worker logs these and moves on to the next scheduled run; nothing is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Push(#[from] nudge_push::PushError),
}
