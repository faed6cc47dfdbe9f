use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Destination for staged uploads, keyed by an already sanitized name.
#[async_trait]
pub trait UploadStorage: Send + Sync {
    /// Persists `data` under `name`, replacing any previous file of that name,
    /// and returns where it was written.
    async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf>;
}

/// Upload directory on the local filesystem.
pub struct LocalUploadStorage {
    dir: PathBuf,
}

impl LocalUploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl UploadStorage for LocalUploadStorage {
    async fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(path)
    }
}
