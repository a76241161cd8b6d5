// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use axum::{Json, extract::State, response::IntoResponse};
use hyper::StatusCode;
use nudge_storage::{ProfileRepository as _, RepositoryAccess as _, RepositoryFactory as _};
use ulid::Ulid;

use crate::{AppState, response::ErrorResponse};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RouteError(#[from] nudge_storage::RepositoryError);

impl IntoResponse for RouteError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self.0, "Health check failed");
        let error = ErrorResponse::new("internal", self.to_string());
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
    }
}

#[tracing::instrument(name = "handler.health", skip_all)]
pub async fn handler(State(state): State<AppState>) -> Result<&'static str, RouteError> {
    // A lookup of a nonexistent document is enough to prove the store
    // round-trips
    let mut repo = state.repository_factory.create().await?;
    repo.profile().lookup(Ulid::nil()).await?;

    Ok("ok")
}
