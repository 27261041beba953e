// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Google-federated authentication with self-contained session tokens.
//!
//! ## Sign-in Flow
//!
//! 1. Frontend obtains an opaque token from Google
//! 2. Frontend sends it to `POST /auth/google`
//! 3. Server:
//!    - Introspects the token against the Google tokeninfo endpoint
//!    - Reconciles the verified identity with the local user record
//!    - Issues an RS256-signed access/refresh token pair
//!
//! ## Subsequent Requests
//!
//! 1. Frontend sends `Authorization: Bearer <access token>`
//! 2. The credential filter verifies the signature and expiry and attaches
//!    the principal; protected routes reject requests without one
//!
//! ## Security
//!
//! - The RSA keypair is loaded from files at startup and never rotated
//!   in-process; startup aborts without it
//! - Verification only uses the public key
//! - All failure paths leave the request unauthenticated (fail closed)
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod google;
pub mod keys;
pub mod middleware;
pub mod token;

pub use claims::{AuthenticatedUser, Identity, TokenClaims, VerifiedClaims};
pub use error::AuthError;
pub use google::GoogleTokenValidator;
pub use keys::SigningKeys;
pub use middleware::{credential_filter, Auth};
pub use token::{TokenError, TokenService, ACCESS_TOKEN_VALIDITY_SECS};
