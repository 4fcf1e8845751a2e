use carpool_core::{KeyValueStore, StoreError};
use std::sync::Arc;
use tracing::info;

use crate::app_config::{StoreBackend, StoreConfig};
use crate::{FileStore, MemoryStore, RedisStore};

pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    info!("Opening {:?} store", config.backend);
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::open(&config.path).await?),
        StoreBackend::Redis => Arc::new(
            RedisStore::new(&config.redis.url, &config.redis.namespace)
                .await
                .map_err(|e| StoreError::Config(e.to_string()))?,
        ),
    };
    Ok(store)
}
