// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use std::sync::Arc;

use axum::body::Body;
use http_body_util::BodyExt;
use hyper::{Request, Response, StatusCode};
use nudge_data_model::MockClock;
use nudge_identity::MockIdentityProvider;
use nudge_storage_mem::MemRepositoryFactory;
use serde::{Serialize, de::DeserializeOwned};
use tower::ServiceExt;

use crate::AppState;

/// Everything the tests need to drive the router against mocks
pub(crate) struct TestState {
    pub repository_factory: MemRepositoryFactory,
    pub identity: Arc<MockIdentityProvider>,
    pub clock: Arc<MockClock>,
}

pub(crate) fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

impl TestState {
    pub(crate) fn new() -> Self {
        setup();

        Self {
            repository_factory: MemRepositoryFactory::new(),
            identity: Arc::new(MockIdentityProvider::new()),
            clock: Arc::new(MockClock::default()),
        }
    }

    fn app_state(&self) -> AppState {
        AppState {
            repository_factory: Arc::new(self.repository_factory.clone()),
            identity: Arc::clone(&self.identity) as _,
            clock: Arc::clone(&self.clock) as _,
        }
    }

    /// Send a single request through a fresh router
    pub(crate) async fn request(&self, request: Request<String>) -> Response<String> {
        let app = crate::router().with_state(self.app_state());
        let response = app
            .oneshot(request.map(Body::from))
            .await
            .expect("infallible");

        let (parts, body) = response.into_parts();
        let body = body.collect().await.expect("failed to read response body");
        let body = String::from_utf8(body.to_bytes().to_vec()).expect("body is not valid UTF-8");
        Response::from_parts(parts, body)
    }
}

pub(crate) trait RequestBuilderExt {
    /// Builds the request with the given JSON value as body.
    fn json<T: Serialize>(self, body: T) -> Request<String>;

    /// Builds the request with an empty body.
    fn empty(self) -> Request<String>;
}

impl RequestBuilderExt for hyper::http::request::Builder {
    fn json<T: Serialize>(self, body: T) -> Request<String> {
        self.header(hyper::header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&body).unwrap())
            .unwrap()
    }

    fn empty(self) -> Request<String> {
        self.body(String::new()).unwrap()
    }
}

pub(crate) trait ResponseExt {
    /// Asserts that the response has the given status code.
    ///
    /// # Panics
    ///
    /// Panics if the response has a different status code.
    fn assert_status(&self, status: StatusCode);

    /// Get the response body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON for the target type.
    fn json<T: DeserializeOwned>(&self) -> T;
}

impl ResponseExt for Response<String> {
    #[track_caller]
    fn assert_status(&self, status: StatusCode) {
        assert_eq!(
            self.status(),
            status,
            "HTTP status code mismatch: got {}, expected {}. Body: {}",
            self.status(),
            status,
            self.body()
        );
    }

    #[track_caller]
    fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_str(self.body()).expect("JSON deserialization of response failed")
    }
}
