//! Storage factory for creating storage instances from configuration.

use std::sync::Arc;

use super::config::StorageConfig;
use super::file::FileStorage;
use super::in_memory::InMemoryStorage;
use super::{FlatStorage, StorageResult};

/// Creates a storage instance based on the provided configuration.
///
/// # Arguments
///
/// * `config` - The storage configuration specifying the backend type and settings.
///
/// # Returns
///
/// Returns an `Arc<dyn FlatStorage>` on success, or a `StorageError` if the
/// backend cannot be initialized (e.g. an unreadable storage file).
pub fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn FlatStorage>> {
    match config {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryStorage::new())),
        StorageConfig::File(file_config) => {
            let storage = FileStorage::open(&file_config.path)?;
            Ok(Arc::new(storage))
        }
    }
}
