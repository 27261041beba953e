// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens are RS256-signed JWTs carrying the claim map from
//! [`TokenClaims`] plus `sub` (the email), `iat` and `exp`. Verification
//! checks the signature before any claim is trusted, then expiry. Two
//! lifetimes exist: short-lived access tokens and long-lived refresh
//! tokens, distinguished by the `type` claim.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use serde_json::json;

use super::claims::{Identity, TokenClaims, VerifiedClaims};
use super::keys::SigningKeys;

/// Access token validity (1 hour).
pub const ACCESS_TOKEN_VALIDITY_SECS: i64 = 60 * 60;

/// Refresh token validity (7 days).
pub const REFRESH_TOKEN_VALIDITY_SECS: i64 = 7 * 24 * 60 * 60;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Errors raised by token verification (and, internally, issuance).
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token could not be parsed as a JWT
    #[error("token is malformed")]
    Malformed,

    /// The signature does not match the verification key
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token is past its expiration
    #[error("token has expired")]
    Expired,

    /// Signing failed while issuing a token
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with the process-wide keypair.
pub struct TokenService {
    keys: SigningKeys,
}

impl TokenService {
    pub fn new(keys: SigningKeys) -> Self {
        Self { keys }
    }

    /// Sign a token valid for `validity_secs` from now.
    pub fn issue(&self, claims: &TokenClaims, validity_secs: i64) -> Result<String, TokenError> {
        self.issue_at(claims, validity_secs, Utc::now())
    }

    /// Short-lived access token.
    pub fn access_token(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        self.issue(claims, ACCESS_TOKEN_VALIDITY_SECS)
    }

    /// Long-lived refresh token for a validated identity.
    ///
    /// Refresh tokens carry `type=refresh-token` and no `userId`.
    pub fn refresh_token(&self, identity: &Identity) -> Result<String, TokenError> {
        let claims = TokenClaims::new(identity.email.clone(), identity.name.clone())
            .with_claim("type", json!("refresh-token"));
        self.issue(&claims, REFRESH_TOKEN_VALIDITY_SECS)
    }

    /// Check signature and expiry, then decode the claims.
    ///
    /// No claim is trusted until the signature check passes.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_aud = false;

        decode::<VerifiedClaims>(token, self.keys.decoding(), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// True iff the token verifies and is not expired.
    ///
    /// All error kinds collapse to `false`; callers that need the reason
    /// use [`TokenService::verify`] directly.
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }

    /// Subject email of a verified token.
    pub fn extract_email(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.verify(token)?.sub)
    }

    /// Expiration instant of a verified token.
    pub fn extract_expiration(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        let claims = self.verify(token)?;
        Utc.timestamp_opt(claims.exp, 0)
            .single()
            .ok_or(TokenError::Malformed)
    }

    fn issue_at(
        &self,
        claims: &TokenClaims,
        validity_secs: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let mut payload = claims.to_claim_map();
        // Registered claims are stamped last so extras cannot shadow them
        payload.insert("sub".to_string(), json!(claims.email));
        payload.insert("iat".to_string(), json!(iat));
        payload.insert("exp".to_string(), json!(iat + validity_secs));

        encode(&Header::new(Algorithm::RS256), &payload, self.keys.encoding())
            .map_err(TokenError::Signing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const PRIVATE_PEM: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jwt_private.pem"));
    const PUBLIC_PEM: &str =
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jwt_public.pem"));
    const OTHER_PRIVATE_PEM: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/other_private.pem"
    ));

    fn service() -> TokenService {
        let keys = SigningKeys::from_pem(PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
            .expect("fixture keys should load");
        TokenService::new(keys)
    }

    fn sample_claims() -> TokenClaims {
        TokenClaims::new("a@x.com", Some("A".to_string()))
            .with_claim("userId", json!("user-1"))
            .with_claim("type", json!("access-token"))
    }

    #[test]
    fn issued_token_verifies_and_round_trips_identity() {
        let service = service();
        let token = service.issue(&sample_claims(), 3600).expect("issue");

        let claims = service.verify(&token).expect("verify");
        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name.as_deref(), Some("A"));
        assert_eq!(claims.token_type(), Some("access-token"));
        assert!(service.is_valid(&token));
    }

    #[test]
    fn back_dated_token_fails_with_expired() {
        let service = service();
        let issued_at = Utc::now() - Duration::hours(2);
        let token = service
            .issue_at(&sample_claims(), 3600, issued_at)
            .expect("issue");

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
        assert!(!service.is_valid(&token));
    }

    #[test]
    fn mutated_signature_fails_with_invalid_signature() {
        let service = service();
        let token = service.issue(&sample_claims(), 3600).expect("issue");

        let (rest, signature) = token.rsplit_once('.').expect("jwt has three segments");
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{rest}.{}", chars.iter().collect::<String>());

        assert!(matches!(
            service.verify(&tampered),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_fails_with_invalid_signature() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let service = service();
        let token = service.issue(&sample_claims(), 3600).expect("issue");

        let segments: Vec<&str> = token.split('.').collect();
        let payload = URL_SAFE_NO_PAD.decode(segments[1]).expect("decode payload");
        let tampered_json = String::from_utf8(payload)
            .expect("utf8 payload")
            .replace("a@x.com", "evil@x.com");
        let tampered = format!(
            "{}.{}.{}",
            segments[0],
            URL_SAFE_NO_PAD.encode(tampered_json.as_bytes()),
            segments[2]
        );

        assert!(matches!(
            service.verify(&tampered),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn token_signed_with_other_key_fails_with_invalid_signature() {
        let service = service();
        let other_keys =
            SigningKeys::from_pem(OTHER_PRIVATE_PEM.as_bytes(), PUBLIC_PEM.as_bytes())
                .expect("fixture keys should load");
        let other = TokenService::new(other_keys);
        let token = other.issue(&sample_claims(), 3600).expect("issue");

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let service = service();
        assert!(matches!(
            service.verify("garbage"),
            Err(TokenError::Malformed)
        ));
        assert!(!service.is_valid("garbage"));
    }

    #[test]
    fn extract_accessors_read_verified_claims() {
        let service = service();
        let token = service.access_token(&sample_claims()).expect("issue");

        assert_eq!(service.extract_email(&token).expect("email"), "a@x.com");

        let expiration = service.extract_expiration(&token).expect("expiration");
        let remaining = expiration - Utc::now();
        assert!(remaining <= Duration::seconds(ACCESS_TOKEN_VALIDITY_SECS));
        assert!(remaining > Duration::seconds(ACCESS_TOKEN_VALIDITY_SECS - 60));
    }

    #[test]
    fn extract_accessors_propagate_verification_errors() {
        let service = service();
        assert!(matches!(
            service.extract_email("garbage"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(
            service.extract_expiration("garbage"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn refresh_token_is_typed_and_carries_no_user_id() {
        let service = service();
        let identity = Identity::new("a@x.com", Some("A".to_string()));
        let token = service.refresh_token(&identity).expect("issue");

        let claims = service.verify(&token).expect("verify");
        assert_eq!(claims.token_type(), Some("refresh-token"));
        assert!(!claims.extra.contains_key("userId"));
        assert_eq!(claims.sub, "a@x.com");
    }
}
