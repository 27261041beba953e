// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Every variant maps to a client-safe status and code; internal causes
/// are logged where they occur and never echoed to the caller.
#[derive(Debug)]
pub enum AuthError {
    /// The request reached a protected route without an attached principal
    Unauthenticated,
    /// The external identity token was rejected or the provider was unreachable
    InvalidExternalCredential,
    /// Sign-in failed for an internal reason (store, signing)
    AuthenticationFailed,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "authentication_required",
            AuthError::InvalidExternalCredential => "invalid_external_credential",
            AuthError::AuthenticationFailed => "authentication_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InvalidExternalCredential => StatusCode::BAD_REQUEST,
            AuthError::AuthenticationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Authentication is required"),
            AuthError::InvalidExternalCredential => write!(f, "Invalid Google token"),
            AuthError::AuthenticationFailed => write!(f, "Authentication failed"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
