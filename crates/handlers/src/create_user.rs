// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

use axum::{Json, extract::State, response::IntoResponse};
use hyper::StatusCode;
use nudge_identity::{IdentityError, IdentityProvider as _};
use nudge_storage::{ProfileRepository as _, RepositoryAccess as _, RepositoryFactory as _};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::{AppState, impl_from_error_for_route, response::ErrorResponse};

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("email, password and name are all required")]
    MissingFields,

    #[error("{message}")]
    AlreadyExists { code: String, message: String },
}

impl_from_error_for_route!(nudge_storage::RepositoryError);

impl From<IdentityError> for RouteError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Provider { code, message } => Self::AlreadyExists { code, message },
            e @ IdentityError::Transport(_) => Self::Internal(Box::new(e)),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "Failed to create user");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal", self.to_string())
                        .with_metadata("details", e.to_string()),
                )
            }
            Self::MissingFields => {
                tracing::warn!("Rejected user creation request with missing fields");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("failed-precondition", self.to_string()),
                )
            }
            Self::AlreadyExists { code, message } => {
                tracing::warn!(identity.error_code = %code, "Identity already exists");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("already-exists", message.clone())
                        .with_metadata("code", code.clone()),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    success: bool,
    user: UserRecord,
}

#[derive(Debug, Serialize)]
struct UserRecord {
    uid: Ulid,
    email: String,
    name: String,
}

/// Register a new user: create the identity with the upstream provider,
/// then write the matching profile document.
///
/// Input is validated before anything is sent upstream. If the profile
/// write fails the identity is intentionally left in place, so a retry of
/// the same request reports the conflict instead of silently diverging.
#[tracing::instrument(
    name = "handler.create_user",
    skip_all,
    fields(user.email = tracing::field::Empty)
)]
pub async fn handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), RouteError> {
    if body.email.is_empty() || body.password.is_empty() || body.name.is_empty() {
        return Err(RouteError::MissingFields);
    }

    tracing::Span::current().record("user.email", body.email.as_str());

    let created = state
        .identity
        .create_identity(&body.email, &body.password)
        .await?;

    let mut repo = state.repository_factory.create().await?;
    let profile = repo
        .profile()
        .add(&*state.clock, created.id, body.email, body.name)
        .await?;

    tracing::info!(profile.id = %profile.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            success: true,
            user: UserRecord {
                uid: profile.id,
                email: profile.email,
                name: profile.name,
            },
        }),
    ))
}
