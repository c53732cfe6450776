//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::sessions::SessionStores;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds process-wide
/// resources only; shopper state lives in the per-session stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    sessions: SessionStores,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let api = ApiClient::new(config.api_url.clone());
        let sessions = SessionStores::new(config.session_idle);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                sessions,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the per-session store registry.
    #[must_use]
    pub fn sessions(&self) -> &SessionStores {
        &self.inner.sessions
    }
}
