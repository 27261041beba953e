// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{GoogleTokenValidator, TokenService};
use crate::users::UserRepository;

/// Shared application state.
///
/// Everything here is constructed once at startup and read-only afterwards,
/// so clones are cheap and no locking is needed across request tasks.
#[derive(Clone)]
pub struct AppState {
    /// Token issuance and verification (holds the signing keypair)
    pub tokens: Arc<TokenService>,
    /// Google tokeninfo client
    pub google: Arc<GoogleTokenValidator>,
    /// User record store
    pub users: Arc<UserRepository>,
}

impl AppState {
    pub fn new(tokens: TokenService, google: GoogleTokenValidator, users: UserRepository) -> Self {
        Self {
            tokens: Arc::new(tokens),
            google: Arc::new(google),
            users: Arc::new(users),
        }
    }
}
