// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential filter and the `Auth` extractor.
//!
//! The filter runs on every request. It reads the `Authorization` header,
//! verifies the bearer token, and on success attaches an
//! [`AuthenticatedUser`] to the request extensions. It never terminates
//! the request itself: a missing or invalid credential just leaves the
//! request unauthenticated, and the decision to reject belongs to the
//! routes that require a principal (via [`Auth`], which rejects with 401
//! when none was attached).

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Attach the authenticated principal when a valid bearer token is present.
pub async fn credential_filter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return next.run(request).await;
    };

    match state.tokens.verify(token.trim()) {
        Ok(claims) => {
            debug!("Set authentication for user: {}", claims.sub);
            request.extensions_mut().insert(AuthenticatedUser {
                email: claims.sub,
                expires_at: claims.exp,
            });
        }
        Err(e) => {
            // Fail closed: drop any partial state and continue unauthenticated
            debug!("Bearer token rejected: {e}");
            request.extensions_mut().remove::<AuthenticatedUser>();
        }
    }

    next.run(request).await
}

/// Extractor for handlers that require an authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
///     // user.email is the verified identity
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}
