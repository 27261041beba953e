// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Google tokeninfo introspection client.
//!
//! Turns an opaque Google-issued token into a verified identity by calling
//! the tokeninfo endpoint. Every failure mode (non-success status, network
//! or timeout failure, missing email, unparsable body) is logged and then
//! collapsed to `None` by [`GoogleTokenValidator::validate`]: callers see a
//! uniform "untrusted token" and cannot accidentally branch on the cause.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use super::claims::Identity;

/// Bounded request timeout; a hung tokeninfo call must not stall the
/// serving task indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a tokeninfo call did not produce an identity.
///
/// Kept distinguishable for logs and monitoring; [`GoogleTokenValidator::validate`]
/// collapses all variants to `None` before they reach callers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("tokeninfo endpoint returned {0}")]
    Status(StatusCode),

    #[error("tokeninfo request failed: {0}")]
    Network(reqwest::Error),

    #[error("tokeninfo response did not include an email")]
    MissingEmail,

    #[error("tokeninfo response was not valid JSON: {0}")]
    Parse(reqwest::Error),
}

/// Fields of interest from the tokeninfo response body.
#[derive(Debug, Deserialize)]
struct TokenInfo {
    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    name: Option<String>,
}

/// Client for the Google tokeninfo endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTokenValidator {
    tokeninfo_url: String,
    client: reqwest::Client,
}

impl GoogleTokenValidator {
    /// Create a validator for the given tokeninfo endpoint URL.
    pub fn new(tokeninfo_url: impl Into<String>) -> Self {
        Self {
            tokeninfo_url: tokeninfo_url.into(),
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Introspect a token, keeping the failure reason.
    pub async fn check(&self, token: &str) -> Result<Identity, ProviderError> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("access_token", token)])
            .send()
            .await
            .map_err(ProviderError::Network)?;

        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let info: TokenInfo = response.json().await.map_err(ProviderError::Parse)?;

        let email = info
            .email
            .filter(|email| !email.is_empty())
            .ok_or(ProviderError::MissingEmail)?;

        Ok(Identity::new(email, info.name))
    }

    /// Introspect a token, collapsing every failure to `None`.
    pub async fn validate(&self, token: &str) -> Option<Identity> {
        match self.check(token).await {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Google token validation failed: {e}");
                None
            }
        }
    }
}
