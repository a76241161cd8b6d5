// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! The HTTP surface of the service: the callable endpoints hit by the
//! mobile clients, plus a health check.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use nudge_data_model::Clock;
use nudge_identity::IdentityProvider;
use nudge_storage::BoxRepositoryFactory;

mod create_user;
mod health;
mod response;

#[cfg(test)]
mod test_utils;

pub use self::response::ErrorResponse;

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub repository_factory: BoxRepositoryFactory,
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

/// Implement `From<E>` for the calling module's `RouteError`, by wrapping it
/// in the `Internal` variant
macro_rules! impl_from_error_for_route {
    ($error:ty) => {
        impl From<$error> for RouteError {
            fn from(e: $error) -> Self {
                Self::Internal(Box::new(e))
            }
        }
    };
}

pub(crate) use impl_from_error_for_route;

/// Build the router for all the endpoints of the service
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(self::health::handler))
        .route("/functions/create-user", post(self::create_user::handler))
}
