use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{ObjectStore, validate_key};

/// Filesystem-backed object store.
///
/// Each key maps to `{base_path}/{key}`; `/` in keys become nested
/// directories. Writes land in `{base_path}/.tmp` first and are renamed into
/// place, so readers never observe a partially written object.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store rooted at `base_path`.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    /// Compute the filesystem path for a key.
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        if key == ".tmp" || key.starts_with(".tmp/") {
            return Err(StorageError::InvalidKey(format!("{key} is reserved")));
        }
        Ok(self.base_path.join(key))
    }

    /// Map a read or remove failure. A key that runs through a file, or names
    /// a directory of nested keys, holds no object.
    fn lookup_error(key: &str, err: std::io::Error) -> StorageError {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::IsADirectory => {
                StorageError::NotFound(key.to_string())
            }
            _ => err.into(),
        }
    }

    /// Map a write failure. `a` and `a/b` cannot both exist on disk, so a key
    /// that collides with the shape of an existing one is rejected as invalid.
    fn write_error(key: &str, err: std::io::Error) -> StorageError {
        match err.kind() {
            ErrorKind::AlreadyExists | ErrorKind::NotADirectory | ErrorKind::IsADirectory => {
                StorageError::InvalidKey(format!("{key} conflicts with an existing object"))
            }
            _ => err.into(),
        }
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key)?;
        fs::read(&path)
            .await
            .map_err(|e| Self::lookup_error(key, e))
    }

    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(key)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Self::write_error(key, e));
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(Self::write_error(key, e));
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        fs::remove_file(&path)
            .await
            .map_err(|e| Self::lookup_error(key, e))
    }
}
