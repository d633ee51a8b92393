//! Async wrapper around KVDb that uses tokio::task::spawn_blocking
//!
//! SQLite calls are blocking, so every operation is moved to the blocking
//! pool and the runtime thread stays free for in-flight network work.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinError;

use crate::{KVDb, KVStoreError};

#[derive(Clone)]
pub struct AsyncKVDb {
    path: PathBuf,
    inner: Arc<Mutex<KVDb>>,
}

fn join_error(e: JoinError) -> KVStoreError {
    KVStoreError::IOError(std::io::Error::other(format!(
        "Failed to spawn blocking task: {e}"
    )))
}

impl AsyncKVDb {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        let path_clone = path.clone();

        let kvdb = tokio::task::spawn_blocking(move || KVDb::new(path_clone))
            .await
            .map_err(join_error)??;

        Ok(Self {
            path,
            inner: Arc::new(Mutex::new(kvdb)),
        })
    }

    pub async fn get<T: DeserializeOwned + Send + 'static>(
        &self,
        key: impl AsRef<str>,
    ) -> Result<Option<T>, KVStoreError> {
        let inner = self.inner.clone();
        let key = key.as_ref().to_string();

        tokio::task::spawn_blocking(move || inner.blocking_lock().get(&key))
            .await
            .map_err(join_error)?
    }

    /// Serializes on the calling task, writes on the blocking pool.
    pub async fn set<V: Serialize + ?Sized>(
        &self,
        key: impl AsRef<str>,
        value: &V,
    ) -> Result<(), KVStoreError> {
        let inner = self.inner.clone();
        let key = key.as_ref().to_string();
        let value_json = serde_json::to_string(value)?;

        tokio::task::spawn_blocking(move || inner.blocking_lock().set_raw(&key, &value_json))
            .await
            .map_err(join_error)?
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
