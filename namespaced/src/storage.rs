//! Namespace-scoped view over flat storage.
//!
//! [`NamespacedStorage`] wraps `Arc<dyn FlatStorage>` with key encoding so
//! that callers only ever see logical keys and raw JSON text.

use std::sync::Arc;

use common::FlatStorage;

use crate::error::{Error, Result};
use crate::model::StoreEntry;
use crate::serde::{Namespace, decode_key, decode_value, encode_key};

/// Namespace-scoped flat storage operations.
#[derive(Clone)]
pub(crate) struct NamespacedStorage {
    namespace: Namespace,
    storage: Arc<dyn FlatStorage>,
}

impl NamespacedStorage {
    /// Creates a new namespace-scoped wrapper.
    pub(crate) fn new(namespace: Namespace, storage: Arc<dyn FlatStorage>) -> Self {
        Self { namespace, storage }
    }

    pub(crate) fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Gets the raw stored text for a logical key.
    pub(crate) fn get(&self, key: &str) -> Result<Option<String>> {
        let storage_key = encode_key(&self.namespace, key);
        Ok(self.storage.get_item(&storage_key)?)
    }

    /// Stores raw text under a logical key.
    pub(crate) fn put(&self, key: &str, raw: &str) -> Result<()> {
        let storage_key = encode_key(&self.namespace, key);
        Ok(self.storage.set_item(&storage_key, raw)?)
    }

    /// Removes a logical key. No-op if the key does not exist.
    pub(crate) fn delete(&self, key: &str) -> Result<()> {
        let storage_key = encode_key(&self.namespace, key);
        Ok(self.storage.remove_item(&storage_key)?)
    }

    /// Snapshots the flat keys belonging to this namespace.
    ///
    /// Values are not read here; [`NamespaceScan`] reads them one at a time
    /// as it is driven.
    pub(crate) fn scan(&self) -> Result<NamespaceScan> {
        let keys: Vec<String> = self
            .storage
            .keys()?
            .into_iter()
            .filter(|k| decode_key(&self.namespace, k).is_some())
            .collect();
        Ok(NamespaceScan {
            storage: self.clone(),
            keys: keys.into_iter(),
            failure: None,
        })
    }

    /// Builds a scan that yields `err` once and then ends.
    pub(crate) fn failed_scan(&self, err: Error) -> NamespaceScan {
        NamespaceScan {
            storage: self.clone(),
            keys: Vec::new().into_iter(),
            failure: Some(err),
        }
    }
}

/// One-shot iterator over the records of a namespace.
///
/// Each item is either a decoded entry or the error for that entry alone;
/// an error never ends the scan early. Keys removed from the flat store after
/// the snapshot was taken are skipped.
pub(crate) struct NamespaceScan {
    storage: NamespacedStorage,
    keys: std::vec::IntoIter<String>,
    failure: Option<Error>,
}

impl NamespaceScan {
    /// Returns the number of flat keys not yet visited.
    pub(crate) fn remaining(&self) -> usize {
        self.keys.len() + usize::from(self.failure.is_some())
    }

    fn read_entry(&self, storage_key: &str) -> Option<Result<StoreEntry>> {
        let key = decode_key(&self.storage.namespace, storage_key)?;
        let raw = match self.storage.storage.get_item(storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => return Some(Err(e.into())),
        };

        match decode_value(&raw) {
            Ok(value) => Some(Ok(StoreEntry {
                key: key.to_string(),
                value,
            })),
            Err(e) => {
                tracing::warn!(
                    namespace = %self.storage.namespace,
                    key = storage_key,
                    error = %e,
                    "skipping undecodable entry"
                );
                Some(Err(e))
            }
        }
    }
}

impl Iterator for NamespaceScan {
    type Item = Result<StoreEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failure.take() {
            return Some(Err(err));
        }
        while let Some(storage_key) = self.keys.next() {
            if let Some(item) = self.read_entry(&storage_key) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}
