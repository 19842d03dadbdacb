// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shared application state.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::identity::{IdentityProvider, StaticIdentityProvider};
use crate::auth::permissions::OperationMap;
use crate::auth::token::TokenService;
use crate::config::{DEFAULT_AUTH_HEADER_PREFIX, DEFAULT_SERVICE_ID, DEFAULT_TOKEN_TTL_SECS};
use crate::providers::PermissionServiceClient;
use crate::store::Store;

/// Authentication settings shared by the extractors.
#[derive(Clone)]
pub struct AuthSettings {
    /// Bearer scheme keyword, compared case-insensitively.
    pub header_prefix: String,
    /// Cookie name for token delivery; `None` disables the cookie.
    pub cookie: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            header_prefix: DEFAULT_AUTH_HEADER_PREFIX.to_string(),
            cookie: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub tokens: Arc<TokenService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: AuthSettings,
    pub operations: Arc<OperationMap>,
    pub permission_service: Option<Arc<PermissionServiceClient>>,
    pub service_id: u32,
}

impl AppState {
    pub fn new(store: Store, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            identity: Arc::new(StaticIdentityProvider::empty()),
            settings: AuthSettings::default(),
            operations: Arc::new(OperationMap::with_defaults()),
            permission_service: None,
            service_id: DEFAULT_SERVICE_ID,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity = provider;
        self
    }

    pub fn with_settings(mut self, settings: AuthSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_permission_service(mut self, client: PermissionServiceClient) -> Self {
        self.permission_service = Some(Arc::new(client));
        self
    }

    pub fn with_service_id(mut self, service_id: u32) -> Self {
        self.service_id = service_id;
        self
    }
}

impl Default for AppState {
    /// Seeded state with a development secret. Used by tests.
    fn default() -> Self {
        let mut store = Store::new();
        store.seed_roles();
        Self::new(store, TokenService::new("dev-secret", DEFAULT_TOKEN_TTL_SECS))
    }
}
