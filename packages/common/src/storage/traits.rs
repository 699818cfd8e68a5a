use async_trait::async_trait;

use super::error::StorageError;

/// Byte-buffer storage addressed by string keys.
///
/// Keys are `/`-separated relative paths (see [`validate_key`]). Implementations
/// must report a missing key as [`StorageError::NotFound`] so callers can tell
/// it apart from backend failures.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full buffer stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `data` under `key`, replacing any previous buffer.
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Remove the buffer stored under `key`.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that `key` is a relative, `/`-separated path without traversal.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key is empty".into()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!("{key} is absolute")));
    }
    if key.contains('\\') || key.contains('\0') {
        return Err(StorageError::InvalidKey(format!(
            "{key} contains a forbidden character"
        )));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(StorageError::InvalidKey(format!(
                "{key} has an empty or relative segment"
            )));
        }
    }
    Ok(())
}
