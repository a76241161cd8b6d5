// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// The type tag attached to every daily reminder notification
pub const DAILY_REMINDER_TYPE: &str = "daily_reminder";

/// An ephemeral multicast notification, built fresh on each dispatch.
///
/// `tokens` keeps the order in which the tokens were collected; the push
/// gateway's per-token response list is index-aligned with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub tokens: Vec<String>,
}

impl NotificationPayload {
    /// Build a daily reminder payload for the given target tokens.
    ///
    /// The metadata map tags the notification as a daily reminder and
    /// records when it was generated.
    #[must_use]
    pub fn daily_reminder(
        title: impl Into<String>,
        body: impl Into<String>,
        sent_at: DateTime<Utc>,
        tokens: Vec<String>,
    ) -> Self {
        let mut data = BTreeMap::new();
        data.insert("type".to_owned(), DAILY_REMINDER_TYPE.to_owned());
        data.insert(
            "sent_at".to_owned(),
            sent_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );

        Self {
            title: title.into(),
            body: body.into(),
            data,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_daily_reminder_metadata() {
        let sent_at = Utc.with_ymd_and_hms(2022, 1, 16, 14, 40, 0).unwrap();
        let payload = NotificationPayload::daily_reminder(
            "Daily reminder",
            "Don't forget to check in today!",
            sent_at,
            vec!["a".to_owned(), "b".to_owned()],
        );

        assert_eq!(payload.data.get("type").unwrap(), DAILY_REMINDER_TYPE);
        assert_eq!(payload.data.get("sent_at").unwrap(), "2022-01-16T14:40:00Z");
        assert_eq!(payload.tokens, &["a", "b"]);
    }
}
