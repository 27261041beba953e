// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Federated sign-in orchestration.
//!
//! Reconciles a Google-verified identity with the local user store and
//! mints a fresh access/refresh token pair. Store and signing failures are
//! logged and wrapped into a single generic error so internal causes never
//! reach the caller.

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::token::ACCESS_TOKEN_VALIDITY_SECS;
use crate::auth::{AuthError, GoogleTokenValidator, Identity, TokenClaims, TokenService};
use crate::state::AppState;

use super::repository::{StoreError, StoreResult, StoredUser, UserRepository};

/// Outcome of a successful federated sign-in.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry (epoch millis)
    pub expires_at: i64,
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Orchestrates external validation, user upsert, and token minting.
pub struct AuthService<'a> {
    google: &'a GoogleTokenValidator,
    users: &'a UserRepository,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            google: &state.google,
            users: &state.users,
            tokens: &state.tokens,
        }
    }

    /// Authenticate an opaque Google token and mint a session token pair.
    pub async fn authenticate(&self, google_token: &str) -> Result<AuthResult, AuthError> {
        info!("Processing Google authentication request");

        let Some(identity) = self.google.validate(google_token).await else {
            warn!("Invalid Google token provided");
            return Err(AuthError::InvalidExternalCredential);
        };

        let user = self.find_or_create(&identity).map_err(|e| {
            error!("User store failure during sign-in: {e}");
            AuthError::AuthenticationFailed
        })?;

        let claims = TokenClaims::new(user.email.clone(), user.name.clone())
            .with_claim("userId", json!(user.id))
            .with_claim("type", json!("access-token"));

        let access_token = self.tokens.access_token(&claims).map_err(|e| {
            error!("Access token signing failed: {e}");
            AuthError::AuthenticationFailed
        })?;

        // Refresh token is minted from the validated identity, not the
        // stored record
        let refresh_token = self.tokens.refresh_token(&identity).map_err(|e| {
            error!("Refresh token signing failed: {e}");
            AuthError::AuthenticationFailed
        })?;

        info!("Authentication successful for user: {}", user.email);

        Ok(AuthResult {
            access_token,
            refresh_token,
            expires_at: Utc::now().timestamp_millis() + ACCESS_TOKEN_VALIDITY_SECS * 1000,
            user_id: user.id,
            email: user.email,
            name: user.name,
        })
    }

    /// Upsert the user record for a verified identity.
    fn find_or_create(&self, identity: &Identity) -> StoreResult<StoredUser> {
        if let Some(user) = self.users.find_by_email(&identity.email)? {
            return self.refresh_login(user, identity);
        }

        info!("Creating new user with email: {}", identity.email);
        let now = Utc::now();
        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            created_at: now,
            last_login_at: now,
        };

        match self.users.create(&user) {
            Ok(()) => Ok(user),
            // Lost a concurrent first sign-in for the same email; retry as
            // a lookup+update instead of failing the request
            Err(StoreError::AlreadyExists(_)) => {
                let existing = self
                    .users
                    .find_by_email(&identity.email)?
                    .ok_or_else(|| StoreError::NotFound(identity.email.clone()))?;
                self.refresh_login(existing, identity)
            }
            Err(e) => Err(e),
        }
    }

    fn refresh_login(&self, mut user: StoredUser, identity: &Identity) -> StoreResult<StoredUser> {
        if identity.name.is_some() && identity.name != user.name {
            user.name = identity.name.clone();
        }
        user.last_login_at = Utc::now();
        self.users.update(&user)?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SigningKeys;
    use axum::{
        extract::Query,
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use std::collections::HashMap;
    use tempfile::TempDir;

    const PRIVATE_PEM: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jwt_private.pem"));
    const PUBLIC_PEM: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jwt_public.pem"));

    /// Stand-in tokeninfo endpoint: `valid-tok` and `tok-<name>` succeed,
    /// everything else is rejected.
    async fn spawn_idp() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");

        let app = Router::new().route(
            "/tokeninfo",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let token = params.get("access_token").map(String::as_str).unwrap_or("");
                match token {
                    "valid-tok" => (
                        StatusCode::OK,
                        Json(serde_json::json!({"email": "a@x.com", "name": "A"})),
                    ),
                    t if t.starts_with("tok-") => (
                        StatusCode::OK,
                        Json(serde_json::json!({
                            "email": "a@x.com",
                            "name": t.trim_start_matches("tok-")
                        })),
                    ),
                    _ => (
                        StatusCode::UNAUTHORIZED,
                        Json(serde_json::json!({"error": "invalid_token"})),
                    ),
                }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test idp");
        });

        format!("http://{addr}/tokeninfo")
    }

    async fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let keys = SigningKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
            .expect("fixture keys should load");
        let tokens = TokenService::new(keys);
        let google = GoogleTokenValidator::new(spawn_idp().await);
        let users = UserRepository::open(dir.path().join("users.redb")).expect("open repo");
        (AppState::new(tokens, google, users), dir)
    }

    #[tokio::test]
    async fn rejected_external_token_fails_with_invalid_credential() {
        let (state, _dir) = test_state().await;
        let service = AuthService::new(&state);

        let result = service.authenticate("nonsense").await;
        assert!(matches!(result, Err(AuthError::InvalidExternalCredential)));
    }

    #[tokio::test]
    async fn first_sign_in_creates_user_and_mints_tokens() {
        let (state, _dir) = test_state().await;
        let service = AuthService::new(&state);

        let result = service.authenticate("valid-tok").await.expect("auth");
        assert!(!result.access_token.is_empty());
        assert!(!result.refresh_token.is_empty());
        assert_eq!(result.email, "a@x.com");
        assert_eq!(result.name.as_deref(), Some("A"));

        let stored = state
            .users
            .find_by_email("a@x.com")
            .expect("find")
            .expect("created");
        assert_eq!(stored.id, result.user_id);
        assert_eq!(stored.created_at, stored.last_login_at);

        // Both tokens verify against our own keys
        let access = state.tokens.verify(&result.access_token).expect("verify");
        assert_eq!(access.token_type(), Some("access-token"));
        assert_eq!(
            access.extra.get("userId").and_then(serde_json::Value::as_str),
            Some(result.user_id.as_str())
        );
        let refresh = state.tokens.verify(&result.refresh_token).expect("verify");
        assert_eq!(refresh.token_type(), Some("refresh-token"));
    }

    #[tokio::test]
    async fn repeat_sign_in_keeps_id_and_bumps_last_login() {
        let (state, _dir) = test_state().await;
        let service = AuthService::new(&state);

        let first = service.authenticate("valid-tok").await.expect("auth");
        let created = state
            .users
            .find_by_email("a@x.com")
            .expect("find")
            .expect("created");

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let second = service.authenticate("valid-tok").await.expect("auth");
        let updated = state
            .users
            .find_by_email("a@x.com")
            .expect("find")
            .expect("still there");

        assert_eq!(second.user_id, first.user_id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.last_login_at > created.last_login_at);
    }

    #[tokio::test]
    async fn changed_name_is_overwritten_on_sign_in() {
        let (state, _dir) = test_state().await;
        let service = AuthService::new(&state);

        let first = service.authenticate("tok-Alice").await.expect("auth");
        assert_eq!(first.name.as_deref(), Some("Alice"));

        let second = service.authenticate("tok-Alicia").await.expect("auth");
        assert_eq!(second.name.as_deref(), Some("Alicia"));
        assert_eq!(second.user_id, first.user_id);

        let stored = state
            .users
            .find_by_email("a@x.com")
            .expect("find")
            .expect("some");
        assert_eq!(stored.name.as_deref(), Some("Alicia"));
    }

    #[tokio::test]
    async fn expires_at_tracks_access_validity() {
        let (state, _dir) = test_state().await;
        let service = AuthService::new(&state);

        let before = Utc::now().timestamp_millis();
        let result = service.authenticate("valid-tok").await.expect("auth");
        let after = Utc::now().timestamp_millis();

        assert!(result.expires_at >= before + ACCESS_TOKEN_VALIDITY_SECS * 1000);
        assert!(result.expires_at <= after + ACCESS_TOKEN_VALIDITY_SECS * 1000);
    }
}
