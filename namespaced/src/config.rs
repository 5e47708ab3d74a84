//! Configuration for opening a namespaced store.

use common::StorageConfig;
use serde::{Deserialize, Serialize};

/// Configuration for opening a [`NamespacedStore`](crate::NamespacedStore).
///
/// # Example
///
/// ```
/// use namespaced::Config;
///
/// let config: Config = serde_json::from_str(r#"{"namespace": "dht"}"#).unwrap();
/// assert_eq!(config.namespace, "dht");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Namespace prefixed to every key. ASCII letters and digits only.
    pub namespace: String,

    /// Flat storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
}

#[cfg(test)]
mod tests {
    use common::FileStorageConfig;

    use super::*;

    #[test]
    fn should_default_storage_to_in_memory() {
        // when
        let config: Config = serde_json::from_str(r#"{"namespace": "test"}"#).unwrap();

        // then
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn should_deserialize_file_storage() {
        // when
        let config: Config = serde_json::from_str(
            r#"{"namespace": "test", "storage": {"type": "File", "path": "kad.json"}}"#,
        )
        .unwrap();

        // then
        assert_eq!(
            config.storage,
            StorageConfig::File(FileStorageConfig {
                path: "kad.json".to_string()
            })
        );
    }
}
