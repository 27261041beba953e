// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and authenticated user representation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A verified external identity.
///
/// Produced by the Google tokeninfo client or decoded from one of our own
/// tokens. Email is the sole identity key; the display name is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email address (unique key for the user store)
    pub email: String,

    /// Display name, when the provider supplied one
    pub name: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }
}

/// Claim set embedded into a token before signing.
///
/// `email` and `name` are always present in the resulting claim map.
/// Additional claims override the base pair on key collision: the `type`
/// and `userId` claims are stamped through `additional` and must not be
/// shadowed by stale base values.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Subject email
    pub email: String,

    /// Display name (serialized as `null` when absent)
    pub name: Option<String>,

    /// Extra claims merged over the base pair
    pub additional: Map<String, Value>,
}

impl TokenClaims {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
            additional: Map::new(),
        }
    }

    /// Add an extra claim. Wins over `email`/`name` on key collision.
    pub fn with_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.additional.insert(key.into(), value);
        self
    }

    /// Flatten into the claim map that gets signed.
    pub fn to_claim_map(&self) -> Map<String, Value> {
        let mut claims = Map::new();
        claims.insert("email".to_string(), json!(self.email));
        claims.insert("name".to_string(), json!(self.name));

        // Additional claims override the base pair
        for (key, value) in &self.additional {
            claims.insert(key.clone(), value.clone());
        }

        claims
    }
}

/// Claims decoded from a token that passed signature and expiry checks.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedClaims {
    /// Subject (the user's email)
    pub sub: String,

    /// Issued at (Unix timestamp)
    #[allow(dead_code)]
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Email claim (mirrors `sub`)
    pub email: String,

    /// Display name, if present in the token
    #[serde(default)]
    pub name: Option<String>,

    /// Remaining claims (`type`, `userId`, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl VerifiedClaims {
    /// Value of the `type` claim, if any.
    pub fn token_type(&self) -> Option<&str> {
        self.extra.get("type").and_then(Value::as_str)
    }
}

/// Authenticated principal attached to a request by the credential filter.
///
/// Carries no roles: the filter establishes identity only, and route
/// placement decides what an identity may reach.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// Email extracted from the verified bearer token
    pub email: String,

    /// Token expiration (Unix timestamp, available for logging)
    #[serde(skip)]
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_map_always_contains_email_and_name() {
        let claims = TokenClaims::new("a@x.com", None);
        let map = claims.to_claim_map();

        assert_eq!(map.get("email"), Some(&json!("a@x.com")));
        assert_eq!(map.get("name"), Some(&Value::Null));
    }

    #[test]
    fn additional_claims_win_on_collision() {
        let claims = TokenClaims::new("a@x.com", Some("A".to_string()))
            .with_claim("name", json!("Overridden"))
            .with_claim("type", json!("access-token"));
        let map = claims.to_claim_map();

        assert_eq!(map.get("name"), Some(&json!("Overridden")));
        assert_eq!(map.get("type"), Some(&json!("access-token")));
        assert_eq!(map.get("email"), Some(&json!("a@x.com")));
    }

    #[test]
    fn merge_is_deterministic() {
        let build = || {
            TokenClaims::new("a@x.com", Some("A".to_string()))
                .with_claim("userId", json!("u-1"))
                .with_claim("email", json!("shadow@x.com"))
                .to_claim_map()
        };

        assert_eq!(build(), build());
        assert_eq!(build().get("email"), Some(&json!("shadow@x.com")));
    }

    #[test]
    fn verified_claims_expose_token_type() {
        let decoded: VerifiedClaims = serde_json::from_value(json!({
            "sub": "a@x.com",
            "iat": 1700000000,
            "exp": 1700003600,
            "email": "a@x.com",
            "name": null,
            "type": "refresh-token"
        }))
        .expect("claims should deserialize");

        assert_eq!(decoded.token_type(), Some("refresh-token"));
        assert_eq!(decoded.name, None);
    }
}
