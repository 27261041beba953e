// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};
use tracing::error;

use crate::{auth::Auth, error::ApiError, models::UserResponse, state::AppState};

/// Get the current authenticated user's stored record.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No record for the authenticated email"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let stored = state
        .users
        .find_by_email(&user.email)
        .map_err(|e| {
            error!("Failed to load user record: {e}");
            ApiError::internal("Failed to load user")
        })?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(stored.into()))
}

/// Plain-text greeting for the authenticated principal.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Profile greeting", body = String),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_profile(Auth(user): Auth) -> String {
    format!("Profile for: {}", user.email)
}
