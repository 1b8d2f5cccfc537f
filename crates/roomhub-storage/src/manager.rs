//! Store factory: picks the backend named in the configuration.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use roomhub_core::config::storage::{StorageBackend, StorageConfig};
use roomhub_core::result::AppResult;
use roomhub_core::traits::store::SnapshotStore;

use crate::providers::{JsonFileStore, MemoryStore};

/// Build the snapshot store selected by `config`.
pub async fn build_store<T>(config: &StorageConfig) -> AppResult<Arc<dyn SnapshotStore<T>>>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let store: Arc<dyn SnapshotStore<T>> = match config.backend {
        StorageBackend::Json => Arc::new(JsonFileStore::new(&config.path).await?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!(backend = store.backend(), path = %config.path, "Snapshot store ready");
    Ok(store)
}
