//! Persistence trait for whole-state snapshots.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::result::AppResult;

/// Trait for backends that persist the complete scheduler state.
///
/// The state is small (a room inventory plus its class sessions), so it is
/// written as a single snapshot after every successful mutation rather than
/// row by row. Implementations must replace the previous snapshot
/// atomically: a concurrent or subsequent [`load`](Self::load) observes
/// either the old snapshot or the new one, never a partial write.
///
/// The trait is generic over the snapshot type so that `roomhub-core`
/// stays free of entity dependencies; implementations live in
/// `roomhub-storage`.
#[async_trait]
pub trait SnapshotStore<T>: Send + Sync + std::fmt::Debug + 'static
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Return the backend type name (e.g., "json", "memory").
    fn backend(&self) -> &str;

    /// Load the last saved snapshot, or `None` if nothing was saved yet.
    async fn load(&self) -> AppResult<Option<T>>;

    /// Durably replace the saved snapshot.
    async fn save(&self, snapshot: &T) -> AppResult<()>;
}
