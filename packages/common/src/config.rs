use std::path::PathBuf;

use serde::Deserialize;

/// Which [`ObjectStore`](crate::storage::ObjectStore) implementation backs the
/// originals and thumbnails stores.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    Memory,
}

/// Storage configuration shared by every binary that opens the stores.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Backend kind. Default: filesystem.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for originals. Default: "./data/originals".
    #[serde(default = "default_originals_dir")]
    pub originals_dir: PathBuf,
    /// Root directory for rendered thumbnails. Default: "./data/thumbnails".
    #[serde(default = "default_thumbnails_dir")]
    pub thumbnails_dir: PathBuf,
}

fn default_originals_dir() -> PathBuf {
    "./data/originals".into()
}
fn default_thumbnails_dir() -> PathBuf {
    "./data/thumbnails".into()
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            originals_dir: default_originals_dir(),
            thumbnails_dir: default_thumbnails_dir(),
        }
    }
}
