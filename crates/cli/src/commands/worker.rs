// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use figment::Figment;
use nudge_config::{AppConfig, ConfigurationSection};
use nudge_data_model::SystemClock;
use nudge_storage_mem::MemRepositoryFactory;
use tracing::{info, info_span};

use crate::{shutdown::ShutdownManager, util};

#[derive(Parser, Debug, Default)]
pub(super) struct Options {}

impl Options {
    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        let shutdown = ShutdownManager::new()?;
        let span = info_span!("cli.worker.init").entered();
        let config = AppConfig::extract(figment).map_err(anyhow::Error::from_boxed)?;

        let http_client = util::http_client()?;
        let worker_state = nudge_tasks::State::new(
            Arc::new(MemRepositoryFactory::new()),
            util::push_gateway_from_config(&config.push, http_client),
            SystemClock::default(),
            config.notifications.clone(),
        );

        info!("Starting task scheduler");
        shutdown.task_tracker().spawn(nudge_tasks::run_worker(
            worker_state,
            shutdown.soft_shutdown_token(),
        ));
        span.exit();

        shutdown.run().await;

        Ok(ExitCode::SUCCESS)
    }
}
