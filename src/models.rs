// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! The sign-in payloads use camelCase field names on the wire, matching
//! the contract the frontend already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::{AuthResult, StoredUser};

/// Request body for `POST /auth/google`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleAuthRequest {
    /// Opaque token obtained from Google on the client
    pub google_token: String,
}

/// Response for a successful federated sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Access token expiry (epoch millis)
    pub expires_at: i64,
    /// The user's id
    pub id: String,
    /// The user's email
    pub email: String,
    /// The user's display name
    pub name: Option<String>,
    /// Reserved; always null
    pub department: Option<String>,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_at: result.expires_at,
            id: result.user_id,
            email: result.email,
            name: result.name,
            department: None,
        }
    }
}

/// Response for `GET /api/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// The user's id
    pub id: String,
    /// The user's email
    pub email: String,
    /// The user's display name
    pub name: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the user last authenticated
    pub last_login_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}
