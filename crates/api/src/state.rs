use std::sync::Arc;
use std::time::Duration;

use khayroukum_events::EventBus;

use crate::cache::ResponseCache;
use crate::config::ServerConfig;
use crate::notifications::Notifier;
use crate::storage::LocalStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything but the pool sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: khayroukum_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Publishes platform events (notification e-mails subscribe here).
    pub event_bus: Arc<EventBus>,
    /// Cache for the public, unauthenticated endpoints.
    pub cache: Arc<ResponseCache>,
    pub storage: Arc<LocalStorage>,
}

impl AppState {
    /// Build the state, deriving cache and storage from `config`.
    pub fn new(pool: khayroukum_db::DbPool, config: ServerConfig, event_bus: Arc<EventBus>) -> Self {
        let cache = ResponseCache::new(Duration::from_secs(config.cache_ttl_secs));
        let storage = LocalStorage::new(config.storage_dir.clone(), &config.public_url);
        Self {
            pool,
            config: Arc::new(config),
            event_bus,
            cache: Arc::new(cache),
            storage: Arc::new(storage),
        }
    }

    pub fn notifier(&self) -> Notifier<'_> {
        Notifier::new(&self.pool, &self.event_bus)
    }
}
