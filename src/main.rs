// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{env, net::SocketAddr, sync::Arc};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use snippet_server::api::router;
use snippet_server::auth::{hash_password, HttpIdentityProvider, TokenService};
use snippet_server::config::{
    AUTH_COOKIE_ENV, AUTH_HEADER_PREFIX_ENV, DEFAULT_SERVICE_ID, DEFAULT_TOKEN_TTL_SECS,
    IDENTITY_PROVIDER_URL_ENV, LOG_FORMAT_ENV, PERMISSION_SERVICE_URL_ENV,
    SEED_SERVICE_PASSWORD_ENV, SEED_SERVICE_USER_ENV, SERVICE_ID_ENV, TOKEN_SECRET_ENV,
    TOKEN_TTL_ENV,
};
use snippet_server::providers::PermissionServiceClient;
use snippet_server::state::{AppState, AuthSettings};
use snippet_server::store::Store;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

fn build_state() -> AppState {
    let mut store = Store::new();
    store.seed_roles();

    if let (Ok(username), Ok(password)) = (
        env::var(SEED_SERVICE_USER_ENV),
        env::var(SEED_SERVICE_PASSWORD_ENV),
    ) {
        let hash = hash_password(&password).expect("Failed to hash seed password");
        store.insert_service_user(&username, hash, vec!["Admin".to_string()]);
        info!(username = %username, "seeded service account");
    }

    let secret = env::var(TOKEN_SECRET_ENV).unwrap_or_else(|_| {
        warn!("TOKEN_SECRET not set, using an insecure development secret");
        "dev-secret".to_string()
    });
    let ttl = env::var(TOKEN_TTL_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

    let mut state = AppState::new(store, TokenService::new(&secret, ttl));

    if let Ok(url) = env::var(IDENTITY_PROVIDER_URL_ENV) {
        info!(url = %url, "using HTTP identity provider");
        let provider =
            HttpIdentityProvider::new(url).expect("Failed to create identity provider client");
        state = state.with_identity_provider(Arc::new(provider));
    } else {
        warn!("IDENTITY_PROVIDER_URL not set, federated logins are disabled");
    }

    if let Ok(url) = env::var(PERMISSION_SERVICE_URL_ENV) {
        info!(url = %url, "mirroring user provisioning to the permission service");
        state = state.with_permission_service(PermissionServiceClient::new(url));
    }

    let mut settings = AuthSettings::default();
    if let Ok(prefix) = env::var(AUTH_HEADER_PREFIX_ENV) {
        settings.header_prefix = prefix;
    }
    settings.cookie = env::var(AUTH_COOKIE_ENV).ok();
    state = state.with_settings(settings);

    let service_id = env::var(SERVICE_ID_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SERVICE_ID);
    state.with_service_id(service_id)
}

#[tokio::main]
async fn main() {
    init_tracing();

    let state = build_state();
    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    info!("snippet server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("shutdown signal received");
}
