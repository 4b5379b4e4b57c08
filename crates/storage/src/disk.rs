//! On-disk artifact cache.
//!
//! Every artifact lives at `{base_dir}/{cache_key}`. A file's presence is
//! proof of validity: files are only ever created by renaming a fully written
//! temp file into place, and a failed build deletes whatever it committed.

use bytes::Bytes;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn, Instrument, Span};

use forecast_common::{CacheKey, ForecastError, ForecastResult};

/// One file produced by a build, waiting to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    pub key: CacheKey,
    pub data: Bytes,
}

impl BuiltArtifact {
    pub fn new(key: CacheKey, data: impl Into<Bytes>) -> Self {
        Self {
            key,
            data: data.into(),
        }
    }
}

/// Filesystem-backed artifact store.
#[derive(Debug, Clone)]
pub struct DiskArtifactStore {
    base_dir: PathBuf,
}

impl DiskArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Final location of `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.base_dir.join(key.as_str())
    }

    pub async fn exists(&self, key: &CacheKey) -> bool {
        tokio::fs::metadata(self.path_for(key))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    #[instrument(skip(self, key), fields(key = %key))]
    pub async fn read(&self, key: &CacheKey) -> ForecastResult<Bytes> {
        let path = self.path_for(key);
        let data = tokio::fs::read(&path).await.map_err(|e| {
            ForecastError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        debug!(size = data.len(), "Read artifact");
        Ok(Bytes::from(data))
    }

    /// Create the cache directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> ForecastResult<()> {
        tokio::fs::create_dir_all(&self.base_dir).await.map_err(|e| {
            ForecastError::Storage(format!(
                "Failed to create cache directory {}: {}",
                self.base_dir.display(),
                e
            ))
        })
    }

    /// Write `data` under `key` via a temp file and a rename.
    ///
    /// Readers never observe a partially written artifact. The temp file is
    /// removed if anything fails before the rename.
    #[instrument(skip(self, key, data), fields(key = %key, size = data.len()))]
    pub async fn write_atomic(&self, key: &CacheKey, data: &[u8]) -> ForecastResult<()> {
        let path = self.path_for(key);
        let tmp = self
            .base_dir
            .join(format!(".{}.tmp.{}", key.as_str(), uuid::Uuid::new_v4()));

        if let Err(e) = write_file(&tmp, data).await {
            remove_quietly(&tmp).await;
            return Err(ForecastError::Storage(format!(
                "Failed to write {}: {}",
                tmp.display(),
                e
            )));
        }

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            remove_quietly(&tmp).await;
            return Err(ForecastError::Storage(format!(
                "Failed to commit {}: {}",
                path.display(),
                e
            )));
        }

        debug!("Committed artifact");
        Ok(())
    }

    /// Delete `key` if present.
    pub async fn remove(&self, key: &CacheKey) {
        remove_quietly(&self.path_for(key)).await;
    }

    /// Serve `key` from disk, building it first on a miss.
    ///
    /// `build` produces every artifact of one build (a PNG and its JSON
    /// sibling, say). All of them are committed, then `key` is read back. If
    /// the build, a write or the read-back fails, artifacts this call already
    /// committed are deleted again.
    ///
    /// The commit runs as its own task: dropping this future while artifacts
    /// are being written still ends with either every artifact or none.
    #[instrument(skip(self, key, build), fields(key = %key))]
    pub async fn read_or_build<F, Fut>(&self, key: &CacheKey, build: F) -> ForecastResult<Bytes>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ForecastResult<Vec<BuiltArtifact>>>,
    {
        if self.exists(key).await {
            debug!(state = "hit", "Serving cached artifact");
            return self.read(key).await;
        }

        debug!(state = "miss", "Building artifact");
        self.ensure_dir().await?;
        let artifacts = build().await?;

        let store = self.clone();
        let requested = key.clone();
        tokio::spawn(
            async move { store.commit(&requested, artifacts).await }.instrument(Span::current()),
        )
        .await
        .map_err(|e| ForecastError::Internal(format!("commit task failed: {}", e)))?
    }

    /// Write every artifact, then read back `key`. Rolls back on failure.
    async fn commit(&self, key: &CacheKey, artifacts: Vec<BuiltArtifact>) -> ForecastResult<Bytes> {
        debug!(state = "writing", count = artifacts.len(), "Writing artifacts");
        let mut committed: Vec<&CacheKey> = Vec::with_capacity(artifacts.len());
        let mut result = Ok(());
        for artifact in &artifacts {
            if let Err(e) = self.write_atomic(&artifact.key, &artifact.data).await {
                result = Err(e);
                break;
            }
            committed.push(&artifact.key);
        }

        let result = match result {
            Ok(()) => self.read(key).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(error = %e, committed = committed.len(), "Build failed, discarding artifacts");
            for committed_key in committed {
                self.remove(committed_key).await;
            }
        }

        result
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove file");
        }
    }
}
