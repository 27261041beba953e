// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Federated sign-in endpoints.

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    auth::AuthError,
    models::{AuthResponse, GoogleAuthRequest},
    state::AppState,
    users::AuthService,
};

/// Exchange a Google-issued token for a local session token pair.
#[utoipa::path(
    post,
    path = "/auth/google",
    tag = "Auth",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Authentication successful", body = AuthResponse),
        (status = 400, description = "Google rejected the token"),
        (status = 500, description = "Internal failure during sign-in"),
    )
)]
pub async fn google_auth(
    State(state): State<AppState>,
    Json(request): Json<GoogleAuthRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    info!("Received Google authentication request");
    let service = AuthService::new(&state);
    let result = service.authenticate(&request.google_token).await?;
    Ok(Json(result.into()))
}

/// Liveness ping for the auth route group.
#[utoipa::path(
    get,
    path = "/auth/test",
    tag = "Auth",
    responses((status = 200, description = "Auth routes are reachable", body = String))
)]
pub async fn auth_test() -> &'static str {
    "Auth endpoint is working"
}
