// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use anyhow::Context as _;
use nudge_data_model::NotificationPayload;
use nudge_push::{MulticastSummary, PushError, PushGateway, SendResponse};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FirebaseResponseExt as _;

/// A [`PushGateway`] backed by the FCM legacy HTTP API
///
/// The legacy API accepts up to 1000 registration ids per request and
/// returns one result per id, in request order.
#[derive(Clone)]
pub struct FcmGateway {
    endpoint: Url,
    server_key: String,
    http_client: reqwest::Client,
}

impl FcmGateway {
    #[must_use]
    pub fn new(endpoint: Url, server_key: String, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            server_key,
            http_client,
        }
    }
}

#[async_trait::async_trait]
impl PushGateway for FcmGateway {
    #[tracing::instrument(
        name = "push.send_multicast",
        skip_all,
        fields(push.tokens = payload.tokens.len()),
        err(Debug),
    )]
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<MulticastSummary, PushError> {
        #[derive(Serialize)]
        struct Notification<'a> {
            title: &'a str,
            body: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            registration_ids: &'a [String],
            notification: Notification<'a>,
            data: &'a BTreeMap<String, String>,
        }

        #[derive(Deserialize)]
        struct SendResult {
            #[serde(default)]
            error: Option<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            success: usize,
            failure: usize,
            results: Vec<SendResult>,
        }

        let url = self
            .endpoint
            .join("fcm/send")
            .context("Invalid push gateway endpoint")
            .map_err(PushError)?;

        let response = self
            .http_client
            .post(url)
            .header(http::header::AUTHORIZATION, format!("key={}", self.server_key))
            .json(&Request {
                registration_ids: &payload.tokens,
                notification: Notification {
                    title: &payload.title,
                    body: &payload.body,
                },
                data: &payload.data,
            })
            .send()
            .await
            .context("Failed to reach the push gateway")
            .map_err(PushError)?;

        let response = response
            .error_for_firebase_error()
            .await
            .map_err(|e| PushError(anyhow::Error::new(e).context("Push gateway rejected the send")))?;

        let body: Response = response
            .json()
            .await
            .context("Failed to deserialize push gateway response")
            .map_err(PushError)?;

        Ok(MulticastSummary {
            success_count: body.success,
            failure_count: body.failure,
            responses: body
                .results
                .into_iter()
                .map(|result| SendResponse {
                    success: result.error.is_none(),
                    error: result.error,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use super::*;

    fn gateway_for(server: &MockServer) -> FcmGateway {
        FcmGateway::new(
            server.uri().parse().unwrap(),
            "test-server-key".to_owned(),
            reqwest::Client::new(),
        )
    }

    fn payload(tokens: &[&str]) -> NotificationPayload {
        NotificationPayload::daily_reminder(
            "Daily reminder",
            "Don't forget to check in today!",
            Utc.with_ymd_and_hms(2022, 1, 16, 14, 40, 0).unwrap(),
            tokens.iter().map(|t| (*t).to_owned()).collect(),
        )
    }

    #[tokio::test]
    async fn test_multicast_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fcm/send"))
            .and(header("authorization", "key=test-server-key"))
            .and(body_partial_json(serde_json::json!({
                "registration_ids": ["a", "b", "c"],
                "notification": {
                    "title": "Daily reminder",
                    "body": "Don't forget to check in today!",
                },
                "data": {
                    "type": "daily_reminder",
                },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "multicast_id": 216,
                "success": 2,
                "failure": 1,
                "results": [
                    { "message_id": "1:0408" },
                    { "error": "NotRegistered" },
                    { "message_id": "1:1516" },
                ],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let payload = payload(&["a", "b", "c"]);
        let summary = gateway.send_multicast(&payload).await.unwrap();

        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(
            summary.failed_tokens(&payload.tokens),
            &[("b", Some("NotRegistered"))]
        );
    }

    #[tokio::test]
    async fn test_unjoinable_endpoint_fails_before_sending() {
        // A cannot-be-a-base URL makes the path join fail
        let gateway = FcmGateway::new(
            "mailto:admin@example.com".parse().unwrap(),
            "test-server-key".to_owned(),
            reqwest::Client::new(),
        );

        assert_matches!(
            gateway.send_multicast(&payload(&["a"])).await,
            Err(PushError(_))
        );
    }

    #[tokio::test]
    async fn test_gateway_error_fails_the_whole_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fcm/send"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        assert_matches!(
            gateway.send_multicast(&payload(&["a"])).await,
            Err(PushError(_))
        );
    }
}
