// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod http;
mod identity;
mod notifications;
mod push;

pub use self::{
    http::HttpConfig,
    identity::IdentityConfig,
    notifications::NotificationsConfig,
    push::PushConfig,
};
use crate::util::ConfigurationSection;

/// Application configuration root
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// Configuration of the HTTP server
    #[serde(default)]
    pub http: HttpConfig,

    /// Configuration related to the identity provider
    pub identity: IdentityConfig,

    /// Configuration related to the push gateway
    pub push: PushConfig,

    /// Configuration of the daily reminder notification
    #[serde(default, skip_serializing_if = "NotificationsConfig::is_default")]
    pub notifications: NotificationsConfig,
}

impl ConfigurationSection for AppConfig {
    fn validate(
        &self,
        figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        self.http.validate(figment)?;
        self.identity.validate(figment)?;
        self.push.validate(figment)?;
        self.notifications.validate(figment)?;

        Ok(())
    }
}

impl AppConfig {
    /// Configuration used in tests
    #[must_use]
    pub fn test() -> Self {
        Self {
            http: HttpConfig::default(),
            identity: IdentityConfig::test(),
            push: PushConfig::test(),
            notifications: NotificationsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        Figment, Jail,
        providers::{Format, Yaml},
    };

    use super::*;

    #[test]
    fn load_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    identity:
                      api_key: abcdef
                    push:
                      server_key: secret
                    notifications:
                      title: Ping
                      schedule: '0 30 7 * * *'
                      timezone: Europe/Paris
                ",
            )?;

            let figment = Figment::new().merge(Yaml::file("config.yaml"));
            let config = AppConfig::extract(&figment).expect("config should load");

            assert_eq!(config.identity.api_key, "abcdef");
            assert_eq!(config.notifications.title, "Ping");
            assert_eq!(config.notifications.timezone().name(), "Europe/Paris");

            Ok(())
        });
    }

    #[test]
    fn invalid_schedule_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r"
                    identity:
                      api_key: abcdef
                    push:
                      server_key: secret
                    notifications:
                      schedule: 'not a cron expression'
                ",
            )?;

            let figment = Figment::new().merge(Yaml::file("config.yaml"));
            assert!(AppConfig::extract(&figment).is_err());

            Ok(())
        });
    }

    #[test]
    fn dump_skips_default_sections() {
        let dump = serde_yaml::to_string(&AppConfig::test()).expect("config should serialize");
        assert!(dump.contains("api_key"));
        // All-default sections are left out of the dump
        assert!(!dump.contains("notifications"));
    }
}
