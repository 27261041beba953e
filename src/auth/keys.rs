// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing key material.
//!
//! The RSA keypair is loaded once at startup from PEM files (private key in
//! PKCS#8 form, public key in X.509/SPKI form) and is read-only afterwards,
//! so it can be shared across all request tasks without locking. Missing or
//! malformed key material is a startup failure: a server that cannot sign or
//! verify its own tokens must not serve traffic.
//!
//! Verification only ever touches the public half, so other services could
//! hold just the public key. Regenerating a fresh key at process start would
//! invalidate every previously issued token and break verification across
//! instances, which is why the pair always comes from durable storage.

use std::fs;
use std::path::Path;

use jsonwebtoken::{DecodingKey, EncodingKey};

/// Errors raised while loading the signing keypair.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("failed to read key material from {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid RSA private key: {0}")]
    InvalidPrivateKey(jsonwebtoken::errors::Error),

    #[error("invalid RSA public key: {0}")]
    InvalidPublicKey(jsonwebtoken::errors::Error),
}

/// Process-wide RSA keypair for token signing and verification.
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

impl SigningKeys {
    /// Load the keypair from PEM files.
    pub fn from_files(
        private_key_path: impl AsRef<Path>,
        public_key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let private_pem = read_pem(private_key_path.as_ref())?;
        let public_pem = read_pem(public_key_path.as_ref())?;
        Self::from_pem(&private_pem, &public_pem)
    }

    /// Build the keypair from in-memory PEM data.
    pub fn from_pem(private_pem: &[u8], public_pem: &[u8]) -> Result<Self, KeyError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(KeyError::InvalidPrivateKey)?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(KeyError::InvalidPublicKey)?;

        Ok(Self { encoding, decoding })
    }

    /// Private half, used only by the signing path.
    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Public half, used by verification.
    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, KeyError> {
    fs::read(path).map_err(|source| KeyError::Unreadable {
        path: path.display().to_string(),
        source,
    })
}
