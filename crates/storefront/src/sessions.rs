//! Registry of per-session application stores.
//!
//! Every browsing session gets its own [`Store`], created empty on first use
//! and dropped once the session has been idle for the configured duration.
//! Nothing is persisted; a restarted process starts every shopper fresh.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use crate::store::Store;

/// Upper bound on concurrently tracked sessions.
const MAX_SESSIONS: u64 = 100_000;

/// Maps session keys to their stores.
#[derive(Clone)]
pub struct SessionStores {
    cache: Cache<Uuid, Store>,
}

impl SessionStores {
    /// Create a registry that evicts stores idle for longer than `idle`.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SESSIONS)
            .time_to_idle(idle)
            .build();

        Self { cache }
    }

    /// The store for `key`, creating an empty one if the session is new or
    /// its previous store was evicted.
    pub async fn store_for(&self, key: Uuid) -> Store {
        self.cache
            .get_with(key, async move {
                tracing::debug!(session = %key, "creating session store");
                Store::new()
            })
            .await
    }
}
