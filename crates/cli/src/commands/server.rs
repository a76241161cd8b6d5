// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use figment::Figment;
use nudge_config::{AppConfig, ConfigurationSection};
use nudge_data_model::SystemClock;
use nudge_handlers::AppState;
use nudge_storage_mem::MemRepositoryFactory;
use tracing::{info, info_span};

use crate::{shutdown::ShutdownManager, util};

#[derive(Parser, Debug, Default)]
pub(super) struct Options {}

impl Options {
    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        let shutdown = ShutdownManager::new()?;
        let span = info_span!("cli.server.init").entered();
        let config = AppConfig::extract(figment).map_err(anyhow::Error::from_boxed)?;

        let http_client = util::http_client()?;

        // The handlers and the scheduler share one document store
        let repository_factory = MemRepositoryFactory::new();

        let state = AppState {
            repository_factory: Arc::new(repository_factory.clone()),
            identity: Arc::new(util::identity_provider_from_config(
                &config.identity,
                http_client.clone(),
            )),
            clock: Arc::new(SystemClock::default()),
        };

        let worker_state = nudge_tasks::State::new(
            Arc::new(repository_factory),
            util::push_gateway_from_config(&config.push, http_client),
            SystemClock::default(),
            config.notifications.clone(),
        );

        let listener = tokio::net::TcpListener::bind(config.http.address)
            .await
            .context("could not bind the HTTP listener")?;
        info!(address = %config.http.address, "Listening");

        let app = nudge_handlers::router().with_state(state);
        let soft_shutdown = shutdown.soft_shutdown_token();
        shutdown.task_tracker().spawn(async move {
            let serve =
                axum::serve(listener, app).with_graceful_shutdown(soft_shutdown.cancelled_owned());
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "HTTP server failed");
            }
        });

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
