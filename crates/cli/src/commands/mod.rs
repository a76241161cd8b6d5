// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};

mod config;
mod server;
mod worker;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Options {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "NUDGE_CONFIG",
        default_value = "config.yaml",
        action = clap::ArgAction::Append
    )]
    config: Vec<Utf8PathBuf>,

    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Parser, Debug)]
enum Subcommand {
    /// Run the HTTP server and the scheduler in the same process
    Server(self::server::Options),

    /// Run the scheduler only
    Worker(self::worker::Options),

    /// Configuration-related sub-commands
    Config(self::config::Options),
}

impl Options {
    /// Assemble the configuration out of the config files and the
    /// environment
    #[must_use]
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new();
        for path in &self.config {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("NUDGE_").split("__"))
    }

    pub async fn run(self, figment: &Figment) -> anyhow::Result<ExitCode> {
        use Subcommand as S;
        match self.subcommand {
            S::Server(c) => c.run(figment).await,
            S::Worker(c) => c.run(figment).await,
            S::Config(c) => c.run(figment).await,
        }
    }
}
