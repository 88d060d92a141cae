use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::MediaStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: baja_db::DbPool,
    /// Server configuration (JWT secrets, media settings).
    pub config: Arc<ServerConfig>,
    /// Writes uploaded media files under the configured root.
    pub storage: Arc<MediaStorage>,
}

impl AppState {
    pub fn new(pool: baja_db::DbPool, config: ServerConfig) -> Self {
        let storage = Arc::new(MediaStorage::new(config.media.root.clone()));
        Self {
            pool,
            config: Arc::new(config),
            storage,
        }
    }
}
