// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::Path};

use tracing::info;
use tracing_subscriber::EnvFilter;

use federated_auth_server::api::router;
use federated_auth_server::auth::{GoogleTokenValidator, SigningKeys, TokenService};
use federated_auth_server::config;
use federated_auth_server::state::AppState;
use federated_auth_server::users::UserRepository;

#[tokio::main]
async fn main() {
    init_tracing();

    // Signing keys are mandatory - a server that cannot sign or verify its
    // own tokens must not start serving
    let private_key_path = env::var(config::JWT_PRIVATE_KEY_PATH_ENV)
        .expect("JWT_PRIVATE_KEY_PATH must be set");
    let public_key_path =
        env::var(config::JWT_PUBLIC_KEY_PATH_ENV).expect("JWT_PUBLIC_KEY_PATH must be set");
    let keys = SigningKeys::from_files(&private_key_path, &public_key_path)
        .expect("Failed to load JWT signing keys");
    let tokens = TokenService::new(keys);

    let tokeninfo_url = env::var(config::GOOGLE_TOKENINFO_URL_ENV)
        .unwrap_or_else(|_| config::DEFAULT_GOOGLE_TOKENINFO_URL.to_string());
    let google = GoogleTokenValidator::new(tokeninfo_url);

    let data_dir =
        env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| config::DEFAULT_DATA_DIR.to_string());
    let users = UserRepository::open(Path::new(&data_dir).join("users.redb"))
        .expect("Failed to open user database");

    let state = AppState::new(tokens, google, users);
    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    info!("Federated auth server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    info!("Shutdown signal received");
}
