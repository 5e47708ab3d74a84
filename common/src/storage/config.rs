//! Storage backend configuration.

use serde::{Deserialize, Serialize};

/// Selects the flat storage backend.
///
/// # Example
///
/// ```
/// use common::StorageConfig;
///
/// let config: StorageConfig =
///     serde_json::from_str(r#"{"type": "File", "path": "/tmp/kad.json"}"#).unwrap();
/// assert!(matches!(config, StorageConfig::File(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    /// Process-local storage that is discarded when dropped.
    #[default]
    InMemory,
    /// Storage mirrored to a JSON file on every write.
    File(FileStorageConfig),
}

/// Configuration for [`FileStorage`](super::file::FileStorage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Path of the JSON file holding the key space.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_in_memory() {
        assert_eq!(StorageConfig::default(), StorageConfig::InMemory);
    }

    #[test]
    fn should_deserialize_in_memory_config() {
        // when
        let config: StorageConfig = serde_json::from_str(r#"{"type": "InMemory"}"#).unwrap();

        // then
        assert_eq!(config, StorageConfig::InMemory);
    }

    #[test]
    fn should_deserialize_file_config() {
        // when
        let config: StorageConfig =
            serde_json::from_str(r#"{"type": "File", "path": "data/store.json"}"#).unwrap();

        // then
        assert_eq!(
            config,
            StorageConfig::File(FileStorageConfig {
                path: "data/store.json".to_string()
            })
        );
    }

    #[test]
    fn should_reject_unknown_backend() {
        // when
        let result = serde_json::from_str::<StorageConfig>(r#"{"type": "SlateDb"}"#);

        // then
        assert!(result.is_err());
    }
}
