pub mod storage;

pub use storage::config::{FileStorageConfig, StorageConfig};
pub use storage::factory::create_storage;
pub use storage::file::FileStorage;
pub use storage::in_memory::InMemoryStorage;
#[cfg(feature = "test-utils")]
pub use storage::in_memory::FailingStorage;
pub use storage::{FlatStorage, StorageError, StorageResult};
