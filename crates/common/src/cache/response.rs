use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::key::CacheKey;
use super::stats::{CacheStats, MetricsCollector};
use crate::error::CommonError;

/// JSON-file cache of API responses.
///
/// Clones share the same directory and counters.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: Option<PathBuf>,
    metrics: MetricsCollector,
}

impl ResponseCache {
    /// Cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: Some(dir.into()), metrics: MetricsCollector::default() }
    }

    /// Cache that never reads or writes; every lookup computes.
    pub fn disabled() -> Self {
        Self { dir: None, metrics: MetricsCollector::default() }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Location of the entry for `key`, if the cache is enabled.
    pub fn path_for(&self, key: &CacheKey) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(key.file_name()))
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }

    /// Return the cached value for `key`, or compute and store it.
    ///
    /// An existing entry is authoritative and `compute` is not called. On a
    /// miss, `compute` runs and a `Some` result is written before being
    /// returned; `None` and errors leave the cache untouched.
    ///
    /// # Errors
    /// Propagates errors from `compute`, and converts unreadable or
    /// unwritable entries into `CommonError`.
    pub async fn read_or_compute<T, E, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<Option<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CommonError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let Some(path) = self.path_for(key) else {
            return compute().await;
        };

        if let Some(value) = read_entry(&path).await? {
            self.metrics.record_hit();
            info!(path = %path.display(), key = key.logical(), "read from cache");
            return Ok(Some(value));
        }

        self.metrics.record_miss();
        let computed = compute().await?;
        if let Some(value) = &computed {
            write_entry(&path, value).await?;
            self.metrics.record_write();
            debug!(path = %path.display(), key = key.logical(), "cached response");
        }
        Ok(computed)
    }
}

async fn read_entry<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CommonError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(CommonError::persistence(format!("read {}", path.display()), err.to_string()))
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| CommonError::serialization_format("JSON", format!("{}: {e}", path.display())))
}

async fn write_entry<T: Serialize>(path: &Path, value: &T) -> Result<(), CommonError> {
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| CommonError::serialization_format("JSON", e.to_string()))?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            CommonError::persistence(format!("create {}", parent.display()), e.to_string())
        })?;
    }

    // Entries appear atomically: a partial write never exists under the final name.
    let staging = path.with_extension("json.partial");
    tokio::fs::write(&staging, &json).await.map_err(|e| {
        CommonError::persistence(format!("write {}", staging.display()), e.to_string())
    })?;
    tokio::fs::rename(&staging, path).await.map_err(|e| {
        CommonError::persistence(format!("rename {}", staging.display()), e.to_string())
    })
}
