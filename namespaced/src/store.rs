//! Core NamespacedStore implementation.

use std::sync::Arc;

use async_trait::async_trait;
use common::FlatStorage;
use common::storage::factory::create_storage;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::reader::{KadStorage, ReadStream};
use crate::serde::{Namespace, decode_value, encode_value};
use crate::storage::NamespacedStorage;

/// A [`KadStorage`] backed by a flat string store, scoped to one namespace.
///
/// Every record is stored in the flat store as `<namespace>_<key>` mapped to
/// the JSON text of its value. Several stores may share one flat store as
/// long as their namespaces differ; each only ever sees its own records.
///
/// The flat store is synchronous, so every operation completes without
/// suspending. The async interface exists so that this store can be swapped
/// for a genuinely asynchronous backend without changing callers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use common::InMemoryStorage;
/// use namespaced::{Error, KadStorage, NamespacedStore};
///
/// # futures::executor::block_on(async {
/// let store = NamespacedStore::new("test", Arc::new(InMemoryStorage::new()))?;
///
/// store.put("a", "b").await?;
/// assert_eq!(store.get::<String>("a").await?, "b");
///
/// store.del("a").await?;
/// assert_eq!(store.get::<String>("a").await, Err(Error::NotFound));
/// # Ok::<(), Error>(())
/// # }).unwrap();
/// ```
#[derive(Clone)]
pub struct NamespacedStore {
    storage: NamespacedStorage,
}

impl NamespacedStore {
    /// Creates a store for `namespace` over an existing flat store.
    ///
    /// Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNamespace`] if `namespace` is empty or contains
    /// anything other than ASCII letters and digits.
    pub fn new(namespace: &str, storage: Arc<dyn FlatStorage>) -> Result<Self> {
        let namespace = Namespace::new(namespace)?;
        tracing::debug!(%namespace, "created namespaced store");
        Ok(Self {
            storage: NamespacedStorage::new(namespace, storage),
        })
    }

    /// Opens a store with the given configuration.
    ///
    /// The namespace is validated before the storage backend is created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNamespace`] for an invalid namespace, or a
    /// storage error if the backend cannot be initialized.
    pub fn open(config: Config) -> Result<Self> {
        let namespace = Namespace::new(config.namespace)?;
        let storage = create_storage(&config.storage)?;
        tracing::debug!(%namespace, storage = ?config.storage, "opened namespaced store");
        Ok(Self {
            storage: NamespacedStorage::new(namespace, storage),
        })
    }

    /// Returns the namespace this store is scoped to.
    pub fn namespace(&self) -> &str {
        self.storage.namespace().as_str()
    }
}

impl std::fmt::Debug for NamespacedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacedStore")
            .field("namespace", &self.namespace())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl KadStorage for NamespacedStore {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn put<V>(&self, key: &str, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized + Sync,
    {
        let raw = encode_value(value)?;
        self.storage.put(key, &raw)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn get<V>(&self, key: &str) -> Result<V>
    where
        V: DeserializeOwned + Send,
    {
        match self.storage.get(key)? {
            Some(raw) => decode_value(&raw),
            None => Err(Error::NotFound),
        }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn del(&self, key: &str) -> Result<()> {
        self.storage.delete(key)
    }

    fn create_read_stream(&self) -> ReadStream {
        let scan = match self.storage.scan() {
            Ok(scan) => scan,
            Err(e) => {
                tracing::warn!(namespace = self.namespace(), error = %e, "failed to list keys");
                self.storage.failed_scan(e)
            }
        };
        tracing::debug!(
            namespace = self.namespace(),
            keys = scan.remaining(),
            "created read stream"
        );
        ReadStream::from_blocking_iter(scan)
    }
}
