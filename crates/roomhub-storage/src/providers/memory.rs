//! In-memory snapshot store.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use roomhub_core::result::AppResult;
use roomhub_core::traits::store::SnapshotStore;

/// Keeps the last saved snapshot in process memory.
///
/// The snapshot is held in serialized form so a load always returns a
/// fresh copy, exactly like a file-backed store would.
pub struct MemoryStore<T> {
    /// Serialized snapshot.
    data: Arc<Mutex<Option<String>>>,
    /// Number of successful saves.
    saves: Arc<AtomicU64>,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(None)),
            saves: Arc::new(AtomicU64::new(0)),
            _snapshot: PhantomData,
        }
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            saves: Arc::clone(&self.saves),
            _snapshot: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("saves", &self.save_count())
            .finish()
    }
}

#[async_trait]
impl<T> SnapshotStore<T> for MemoryStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn backend(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> AppResult<Option<T>> {
        let data = self.data.lock().await;
        match data.as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &T) -> AppResult<()> {
        let json = serde_json::to_string(snapshot)?;
        let mut data = self.data.lock().await;
        *data = Some(json);
        let saves = self.saves.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(saves, "Saved in-memory snapshot");
        Ok(())
    }
}
