use std::sync::Arc;

use common::storage::{
    FilesystemObjectStore, MemoryObjectStore, ObjectStore, StorageError,
};
use common::StorageBackend;

use crate::config::AppConfig;
use crate::imaging::{ImageTransformer, RustTransformer};
use crate::registry::{EtagRegistry, TierRegistry};
use crate::resolve::InflightBuilds;

#[derive(Clone)]
pub struct AppState {
    pub originals: Arc<dyn ObjectStore>,
    pub thumbnails: Arc<dyn ObjectStore>,
    pub etags: Arc<EtagRegistry>,
    pub tiers: Arc<TierRegistry>,
    pub transformer: Arc<dyn ImageTransformer>,
    /// Present when `thumbnails.dedupe_inflight` is enabled.
    pub inflight: Option<Arc<InflightBuilds>>,
    pub config: AppConfig,
}

impl AppState {
    /// Assemble state around existing stores; registries start empty.
    pub fn new(
        config: AppConfig,
        originals: Arc<dyn ObjectStore>,
        thumbnails: Arc<dyn ObjectStore>,
        transformer: Arc<dyn ImageTransformer>,
    ) -> Self {
        let inflight = config
            .thumbnails
            .dedupe_inflight
            .then(|| Arc::new(InflightBuilds::new()));

        Self {
            originals,
            thumbnails,
            etags: Arc::new(EtagRegistry::new()),
            tiers: Arc::new(TierRegistry::new()),
            transformer,
            inflight,
            config,
        }
    }

    /// Open the configured stores and the production transformer.
    pub async fn from_config(config: AppConfig) -> Result<Self, StorageError> {
        let (originals, thumbnails): (Arc<dyn ObjectStore>, Arc<dyn ObjectStore>) =
            match config.storage.backend {
                StorageBackend::Filesystem => (
                    Arc::new(FilesystemObjectStore::new(config.storage.originals_dir.clone()).await?),
                    Arc::new(
                        FilesystemObjectStore::new(config.storage.thumbnails_dir.clone()).await?,
                    ),
                ),
                StorageBackend::Memory => (
                    Arc::new(MemoryObjectStore::new()),
                    Arc::new(MemoryObjectStore::new()),
                ),
            };

        let transformer = Arc::new(RustTransformer::new(config.thumbnails.jpeg_quality));
        Ok(Self::new(config, originals, thumbnails, transformer))
    }
}
