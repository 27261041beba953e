// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::credential_filter,
    models::{AuthResponse, GoogleAuthRequest, UserResponse},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

/// Build the application router.
///
/// The credential filter runs on every route and only attaches identity;
/// `/auth/*` and the health endpoints are open, while `/api/*` handlers
/// require the attached principal and reject without one.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/auth/google", post(auth::google_auth))
        .route("/auth/test", get(auth::auth_test))
        .route("/api/users/me", get(users::get_current_user))
        .route("/api/users/profile", get(users::get_profile))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            credential_filter,
        ))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::google_auth,
        auth::auth_test,
        users::get_current_user,
        users::get_profile,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            GoogleAuthRequest,
            AuthResponse,
            UserResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Federated sign-in and token issuance"),
        (name = "Users", description = "Authenticated user endpoints"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
