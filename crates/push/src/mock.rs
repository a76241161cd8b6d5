// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! A mock implementation of the [`PushGateway`] trait, which never leaves
//! the process. Useful for tests.

use std::{
    collections::HashSet,
    sync::{Mutex, atomic::AtomicBool},
};

use nudge_data_model::NotificationPayload;

use crate::{MulticastSummary, PushError, SendResponse};

/// The error identifier reported for tokens which are no longer registered
/// with the gateway
pub const TOKEN_NOT_REGISTERED: &str = "registration-token-not-registered";

/// A mock push gateway which records every submitted payload
///
/// Tokens listed as invalid fail with [`TOKEN_NOT_REGISTERED`]; every other
/// token succeeds.
#[derive(Default)]
pub struct PushGateway {
    invalid_tokens: HashSet<String>,
    sent: Mutex<Vec<NotificationPayload>>,
    fail_next_send: AtomicBool,
}

impl PushGateway {
    /// Create a new mock gateway which accepts every token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mock gateway which rejects the given tokens
    #[must_use]
    pub fn with_invalid_tokens<I: IntoIterator<Item = S>, S: Into<String>>(tokens: I) -> Self {
        Self {
            invalid_tokens: tokens.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Make the next multicast call fail as a whole
    pub fn fail_next_send(&self) {
        self.fail_next_send
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Every payload submitted so far, in submission order
    pub fn sent(&self) -> Vec<NotificationPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl crate::PushGateway for PushGateway {
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<MulticastSummary, PushError> {
        if self
            .fail_next_send
            .swap(false, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(PushError(anyhow::anyhow!("gateway unavailable")));
        }

        self.sent.lock().unwrap().push(payload.clone());

        let responses: Vec<SendResponse> = payload
            .tokens
            .iter()
            .map(|token| {
                if self.invalid_tokens.contains(token) {
                    SendResponse {
                        success: false,
                        error: Some(TOKEN_NOT_REGISTERED.to_owned()),
                    }
                } else {
                    SendResponse {
                        success: true,
                        error: None,
                    }
                }
            })
            .collect();

        let failure_count = responses.iter().filter(|r| !r.success).count();
        Ok(MulticastSummary {
            success_count: responses.len() - failure_count,
            failure_count,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::PushGateway as _;

    fn payload(tokens: &[&str]) -> NotificationPayload {
        NotificationPayload::daily_reminder(
            "Daily reminder",
            "Don't forget to check in today!",
            Utc.with_ymd_and_hms(2022, 1, 16, 14, 40, 0).unwrap(),
            tokens.iter().map(|t| (*t).to_owned()).collect(),
        )
    }

    #[tokio::test]
    async fn test_responses_are_index_aligned() {
        let gateway = PushGateway::with_invalid_tokens(["b"]);
        let payload = payload(&["a", "b", "c"]);

        let summary = gateway.send_multicast(&payload).await.unwrap();
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.responses.len(), 3);
        assert!(summary.responses[0].success);
        assert!(!summary.responses[1].success);
        assert!(summary.responses[2].success);

        let failed = summary.failed_tokens(&payload.tokens);
        assert_eq!(failed, &[("b", Some(TOKEN_NOT_REGISTERED))]);

        assert_eq!(gateway.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_whole_call_failure() {
        let gateway = PushGateway::new();
        gateway.fail_next_send();

        gateway.send_multicast(&payload(&["a"])).await.unwrap_err();
        // The failed call is not recorded as a send
        assert!(gateway.sent().is_empty());

        // And the next one goes through again
        gateway.send_multicast(&payload(&["a"])).await.unwrap();
        assert_eq!(gateway.sent().len(), 1);
    }
}
