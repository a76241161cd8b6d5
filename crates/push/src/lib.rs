// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Abstraction over the push-notification gateway
//!
//! The gateway fans one multicast send out to every targeted device and
//! reports a per-token outcome list, index-aligned with the submitted token
//! list. Delivery retries, if any, are the gateway's business; this crate
//! only models the call.

mod mock;

use std::sync::Arc;

use nudge_data_model::NotificationPayload;

pub use self::mock::PushGateway as MockPushGateway;

/// The outcome of one token's delivery within a multicast send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    /// Whether the gateway accepted the message for this token
    pub success: bool,

    /// The gateway's error identifier when it did not
    pub error: Option<String>,
}

/// The aggregate outcome of a multicast send
///
/// `responses` has exactly one entry per submitted token, in submission
/// order: the response at index `i` is the outcome for the token at index
/// `i` of the payload's token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastSummary {
    /// How many tokens were delivered to
    pub success_count: usize,

    /// How many tokens failed
    pub failure_count: usize,

    /// Per-token outcomes, index-aligned with the submitted token list
    pub responses: Vec<SendResponse>,
}

impl MulticastSummary {
    /// The tokens whose delivery failed, with the gateway's reported error
    ///
    /// Relies on the index alignment between `responses` and the submitted
    /// token list.
    #[must_use]
    pub fn failed_tokens<'a>(&'a self, tokens: &'a [String]) -> Vec<(&'a str, Option<&'a str>)> {
        self.responses
            .iter()
            .zip(tokens)
            .filter(|(response, _token)| !response.success)
            .map(|(response, token)| (token.as_str(), response.error.as_deref()))
            .collect()
    }
}

/// An error reported by the push gateway for the whole multicast call
///
/// Per-token failures are not errors; they are reported through
/// [`MulticastSummary::responses`].
#[derive(Debug, thiserror::Error)]
#[error("push gateway request failed")]
pub struct PushError(#[source] pub anyhow::Error);

#[async_trait::async_trait]
pub trait PushGateway: Send + Sync {
    /// Submit one multicast send over every token of the payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway is unreachable or rejected the
    /// request as a whole. Individual token failures are part of the
    /// returned summary, not of the error path.
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<MulticastSummary, PushError>;
}

#[async_trait::async_trait]
impl<T: PushGateway + Send + Sync + ?Sized> PushGateway for &T {
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<MulticastSummary, PushError> {
        (**self).send_multicast(payload).await
    }
}

#[async_trait::async_trait]
impl<T: PushGateway + ?Sized> PushGateway for Arc<T> {
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<MulticastSummary, PushError> {
        (**self).send_multicast(payload).await
    }
}
