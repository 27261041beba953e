// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User records and sign-in orchestration.

pub mod repository;
pub mod service;

pub use repository::{StoreError, StoredUser, UserRepository};
pub use service::{AuthResult, AuthService};
