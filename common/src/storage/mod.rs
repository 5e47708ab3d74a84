pub mod config;
pub mod factory;
pub mod file;
pub mod in_memory;

/// Error type for storage operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),
    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Converts a storage error to StorageError::Storage.
    pub fn from_storage(e: impl std::fmt::Display) -> Self {
        StorageError::Storage(e.to_string())
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A flat, synchronous, string-only key-value store.
///
/// This is the host storage primitive: every key and every value is a string,
/// there is no notion of prefixes or namespaces, and each call is atomic on
/// its own. Higher layers add structure on top by encoding it into keys.
///
/// Enumeration follows the web storage model: [`len`](FlatStorage::len)
/// reports how many keys exist and [`key`](FlatStorage::key) returns the key
/// at a given index. Index order is implementation-defined and may change
/// after any mutation.
pub trait FlatStorage: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Returns the value stored under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Removes `key`. No-op if the key does not exist.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Returns the number of stored keys.
    fn len(&self) -> StorageResult<usize>;

    /// Returns the key at `index`, or `None` if the index is out of range.
    fn key(&self, index: usize) -> StorageResult<Option<String>>;

    /// Removes every key.
    fn clear(&self) -> StorageResult<()>;

    /// Returns `true` if the store holds no keys.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns a snapshot of every key currently stored.
    ///
    /// The default implementation walks the indexed accessors. Implementations
    /// that can list their keys directly should override it.
    fn keys(&self) -> StorageResult<Vec<String>> {
        let len = self.len()?;
        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(key) = self.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl std::fmt::Debug for dyn FlatStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FlatStorage {{ ... }}")
    }
}
