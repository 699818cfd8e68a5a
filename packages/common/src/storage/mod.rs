mod error;
mod traits;

pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use filesystem::FilesystemObjectStore;
pub use memory::MemoryObjectStore;
pub use traits::{ObjectStore, validate_key};
