// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_PRIVATE_KEY_PATH` | PKCS#8 PEM private key for token signing | Required |
//! | `JWT_PUBLIC_KEY_PATH` | X.509 PEM public key for token verification | Required |
//! | `GOOGLE_TOKENINFO_URL` | Google tokeninfo introspection endpoint | Google production endpoint |
//! | `DATA_DIR` | Root directory for the user database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable for the PEM-encoded RSA private key path (PKCS#8).
///
/// Required. The server refuses to start without usable key material:
/// a fresh key per process would invalidate every previously issued token
/// and break verification across instances.
pub const JWT_PRIVATE_KEY_PATH_ENV: &str = "JWT_PRIVATE_KEY_PATH";

/// Environment variable for the PEM-encoded RSA public key path (X.509).
///
/// Required. Only this half is needed for verification, so it can also be
/// distributed to other services.
pub const JWT_PUBLIC_KEY_PATH_ENV: &str = "JWT_PUBLIC_KEY_PATH";

/// Environment variable for the Google tokeninfo endpoint URL.
pub const GOOGLE_TOKENINFO_URL_ENV: &str = "GOOGLE_TOKENINFO_URL";

/// Default tokeninfo endpoint (Google production).
pub const DEFAULT_GOOGLE_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";

/// Environment variable name for the data directory path.
///
/// The user database (`users.redb`) lives here.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "/data";
