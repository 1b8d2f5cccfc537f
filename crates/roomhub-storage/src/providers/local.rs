//! JSON file snapshot store on the local filesystem.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use roomhub_core::error::{AppError, ErrorKind};
use roomhub_core::result::AppResult;
use roomhub_core::traits::store::SnapshotStore;

/// Stores the snapshot as pretty-printed JSON in a single file.
///
/// Saves go to a sibling `*.tmp` file which is flushed to disk and then
/// renamed over the target, so readers only ever see a complete snapshot.
pub struct JsonFileStore<T> {
    /// Target state file.
    path: PathBuf,
    _snapshot: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}

impl<T> JsonFileStore<T> {
    /// Create a store writing to `path`, creating the parent directory.
    pub async fn new(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageFailure,
                    format!("Failed to create state directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(Self {
            path,
            _snapshot: PhantomData,
        })
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl<T> SnapshotStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn backend(&self) -> &str {
        "json"
    }

    async fn load(&self) -> AppResult<Option<T>> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::StorageFailure,
                    format!("Failed to read state file: {}", self.path.display()),
                    e,
                ));
            }
        };

        let snapshot = serde_json::from_slice(&data).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Corrupt state file {}: {e}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), bytes = data.len(), "Loaded state file");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &T) -> AppResult<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();

        let write = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(&data).await?;
            file.sync_all().await?;
            fs::rename(&temp, &self.path).await
        };

        if let Err(e) = write.await {
            fs::remove_file(&temp).await.ok();
            return Err(AppError::with_source(
                ErrorKind::StorageFailure,
                format!("Failed to write state file: {}", self.path.display()),
                e,
            ));
        }

        debug!(path = %self.path.display(), bytes = data.len(), "Saved state file");
        Ok(())
    }
}
