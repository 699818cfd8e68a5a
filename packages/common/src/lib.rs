pub mod config;
pub mod hash;
pub mod storage;

pub use config::{StorageAppConfig, StorageBackend};
pub use hash::ContentHash;
