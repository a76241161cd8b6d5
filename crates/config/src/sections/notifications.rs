// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use chrono_tz::Tz;
use cron::Schedule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigurationSection;

fn default_title() -> String {
    "Daily reminder".to_owned()
}

fn default_body() -> String {
    "Don't forget to check in today!".to_owned()
}

fn default_schedule() -> String {
    // Every day at 09:00
    "0 0 9 * * *".to_owned()
}

fn default_timezone() -> String {
    "UTC".to_owned()
}

/// Configuration of the daily reminder notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NotificationsConfig {
    /// The title of the notification
    #[serde(default = "default_title")]
    pub title: String,

    /// The body of the notification
    #[serde(default = "default_body")]
    pub body: String,

    /// When to send it, as a cron expression with seconds
    #[serde(default = "default_schedule")]
    pub schedule: String,

    /// The IANA name of the time zone the schedule is evaluated in
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            body: default_body(),
            schedule: default_schedule(),
            timezone: default_timezone(),
        }
    }
}

impl ConfigurationSection for NotificationsConfig {
    const PATH: Option<&'static str> = Some("notifications");

    fn validate(
        &self,
        _figment: &figment::Figment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        Schedule::from_str(&self.schedule)?;
        Tz::from_str(&self.timezone).map_err(|e| format!("invalid timezone: {e}"))?;

        Ok(())
    }
}

impl NotificationsConfig {
    pub(crate) fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// The parsed cron schedule
    ///
    /// # Panics
    ///
    /// Panics if the expression is invalid; [`ConfigurationSection::validate`]
    /// rejects such configurations at load time.
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        Schedule::from_str(&self.schedule).expect("schedule was validated at load time")
    }

    /// The parsed time zone
    ///
    /// # Panics
    ///
    /// Panics if the name is unknown; [`ConfigurationSection::validate`]
    /// rejects such configurations at load time.
    #[must_use]
    pub fn timezone(&self) -> Tz {
        Tz::from_str(&self.timezone).expect("timezone was validated at load time")
    }
}
