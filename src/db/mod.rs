use std::sync::Arc;
use tracing::info;

use crate::server::config::ServerConfig;

pub mod entities;
pub mod models;
pub mod services;

use services::{DesignStore, MemoryDesignStore, SqlDesignStore, StoreError};

/// Picks the store named by `database_uri`. `memory://` gives a process-local
/// store seeded with the sample designs.
pub async fn connect_store(config: &ServerConfig) -> Result<Arc<dyn DesignStore>, StoreError> {
    if config.uses_memory_store() {
        info!("Using in-memory design store.");
        return Ok(Arc::new(MemoryDesignStore::with_samples()));
    }

    let scheme = config
        .database_uri
        .split(':')
        .next()
        .unwrap_or_default();
    info!(
        scheme,
        pool_size = config.database_pool_size,
        pool_timeout_secs = config.database_pool_timeout,
        "Connecting to design database."
    );
    let store = SqlDesignStore::connect(config).await?;
    Ok(Arc::new(store))
}
