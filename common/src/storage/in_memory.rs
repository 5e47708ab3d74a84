use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::{FlatStorage, StorageError, StorageResult};

/// In-memory implementation of the FlatStorage trait using a BTreeMap.
///
/// This implementation stores all data in memory and is useful for testing
/// or scenarios where durability is not required. Cloning an
/// `InMemoryStorage` yields a handle to the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryStorage {
    /// Creates a new InMemoryStorage instance with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new InMemoryStorage pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }
}

impl FlatStorage for InMemoryStorage {
    #[tracing::instrument(level = "trace", skip_all)]
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.get(key).cloned())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        data.remove(key);
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }

    fn key(&self, index: usize) -> StorageResult<Option<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.keys().nth(index).cloned())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        data.clear();
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn keys(&self) -> StorageResult<Vec<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.keys().cloned().collect())
    }
}

/// Injected failure that fires either once or on every call.
#[cfg(feature = "test-utils")]
#[derive(Clone)]
enum Failure {
    /// Error is returned once, then automatically cleared.
    Once(StorageError),
    /// Error is returned on every subsequent call until explicitly cleared.
    Persistent(StorageError),
}

#[cfg(feature = "test-utils")]
type FailSlot = arc_swap::ArcSwap<Option<Failure>>;

/// Checks a [`FailSlot`] and returns an error if one is set.
///
/// For [`Failure::Once`], the slot is atomically swapped to `None` so the
/// error fires exactly once. For [`Failure::Persistent`], the slot is left
/// unchanged.
#[cfg(feature = "test-utils")]
fn check_failure(slot: &FailSlot) -> StorageResult<()> {
    let guard = slot.load();
    match guard.as_ref() {
        None => Ok(()),
        Some(Failure::Persistent(err)) => Err(err.clone()),
        Some(Failure::Once(_)) => {
            let prev = slot.swap(Arc::new(None));
            match prev.as_ref() {
                Some(Failure::Once(err)) => Err(err.clone()),
                _ => Ok(()),
            }
        }
    }
}

/// A storage wrapper that delegates to an inner [`FlatStorage`] but can inject
/// failures into writes, reads, and key enumeration on demand.
///
/// Failures can be *persistent* (returned on every call until cleared) or
/// *once* (returned on the next call, then automatically cleared).
///
/// Gated behind the `test-utils` feature.
///
/// # Example
///
/// ```ignore
/// let storage = FailingStorage::wrap(Arc::new(InMemoryStorage::new()));
/// storage.fail_set(StorageError::Storage("quota exceeded".into()));
/// // every set_item call now returns Err(...)
///
/// storage.fail_get_once(StorageError::Storage("io error".into()));
/// // only the next get_item call returns Err(...), then auto-clears
/// ```
#[cfg(feature = "test-utils")]
pub struct FailingStorage {
    inner: Arc<dyn FlatStorage>,
    fail_set: FailSlot,
    fail_get: FailSlot,
    fail_remove: FailSlot,
    fail_list: FailSlot,
}

#[cfg(feature = "test-utils")]
impl FailingStorage {
    /// Wraps an existing storage, with all failure injections initially `None`.
    pub fn wrap(inner: Arc<dyn FlatStorage>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_set: arc_swap::ArcSwap::from_pointee(None),
            fail_get: arc_swap::ArcSwap::from_pointee(None),
            fail_remove: arc_swap::ArcSwap::from_pointee(None),
            fail_list: arc_swap::ArcSwap::from_pointee(None),
        })
    }

    /// Makes `set_item` return the given error on every subsequent call.
    pub fn fail_set(&self, err: StorageError) {
        self.fail_set.store(Arc::new(Some(Failure::Persistent(err))));
    }

    /// Makes `set_item` return the given error on the next call only.
    pub fn fail_set_once(&self, err: StorageError) {
        self.fail_set.store(Arc::new(Some(Failure::Once(err))));
    }

    /// Makes `get_item` return the given error on every subsequent call.
    pub fn fail_get(&self, err: StorageError) {
        self.fail_get.store(Arc::new(Some(Failure::Persistent(err))));
    }

    /// Makes `get_item` return the given error on the next call only.
    pub fn fail_get_once(&self, err: StorageError) {
        self.fail_get.store(Arc::new(Some(Failure::Once(err))));
    }

    /// Makes `remove_item` and `clear` return the given error on every subsequent call.
    pub fn fail_remove(&self, err: StorageError) {
        self.fail_remove
            .store(Arc::new(Some(Failure::Persistent(err))));
    }

    /// Makes `len`, and therefore `keys`, return the given error on every
    /// subsequent call.
    pub fn fail_list(&self, err: StorageError) {
        self.fail_list
            .store(Arc::new(Some(Failure::Persistent(err))));
    }

    /// Clears every injected failure.
    pub fn reset(&self) {
        self.fail_set.store(Arc::new(None));
        self.fail_get.store(Arc::new(None));
        self.fail_remove.store(Arc::new(None));
        self.fail_list.store(Arc::new(None));
    }
}

#[cfg(feature = "test-utils")]
impl FlatStorage for FailingStorage {
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        check_failure(&self.fail_set)?;
        self.inner.set_item(key, value)
    }

    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        check_failure(&self.fail_get)?;
        self.inner.get_item(key)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        check_failure(&self.fail_remove)?;
        self.inner.remove_item(key)
    }

    fn len(&self) -> StorageResult<usize> {
        check_failure(&self.fail_list)?;
        self.inner.len()
    }

    fn key(&self, index: usize) -> StorageResult<Option<String>> {
        self.inner.key(index)
    }

    fn clear(&self) -> StorageResult<()> {
        check_failure(&self.fail_remove)?;
        self.inner.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_none_when_key_not_found() {
        // given
        let storage = InMemoryStorage::new();

        // when
        let result = storage.get_item("missing_key");

        // then
        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn should_store_and_retrieve_item() {
        // given
        let storage = InMemoryStorage::new();

        // when
        storage.set_item("test_key", "test_value").unwrap();
        let result = storage.get_item("test_key").unwrap();

        // then
        assert_eq!(result, Some("test_value".to_string()));
    }

    #[test]
    fn should_overwrite_existing_key() {
        // given
        let storage = InMemoryStorage::new();
        storage.set_item("key", "old").unwrap();

        // when
        storage.set_item("key", "new").unwrap();

        // then
        assert_eq!(storage.get_item("key").unwrap(), Some("new".to_string()));
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn should_store_empty_value() {
        // given
        let storage = InMemoryStorage::new();

        // when
        storage.set_item("key", "").unwrap();

        // then
        assert_eq!(storage.get_item("key").unwrap(), Some(String::new()));
    }

    #[test]
    fn should_remove_item() {
        // given
        let storage = InMemoryStorage::new();
        storage.set_item("key", "value").unwrap();

        // when
        storage.remove_item("key").unwrap();

        // then
        assert!(storage.get_item("key").unwrap().is_none());
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn should_remove_missing_item_without_error() {
        // given
        let storage = InMemoryStorage::new();

        // when
        let result = storage.remove_item("missing");

        // then
        assert!(result.is_ok());
    }

    #[test]
    fn should_enumerate_keys_by_index() {
        // given
        let storage = InMemoryStorage::with_entries([("b", "2"), ("a", "1"), ("c", "3")]);

        // when
        let len = storage.len().unwrap();
        let keys: Vec<_> = (0..len).map(|i| storage.key(i).unwrap().unwrap()).collect();

        // then
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert!(storage.key(len).unwrap().is_none());
    }

    #[test]
    fn should_list_all_keys() {
        // given
        let storage = InMemoryStorage::new();
        storage.set_item("x", "1").unwrap();
        storage.set_item("y", "2").unwrap();

        // when
        let keys = storage.keys().unwrap();

        // then
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn should_clear_all_items() {
        // given
        let storage = InMemoryStorage::with_entries([("a", "1"), ("b", "2")]);

        // when
        storage.clear().unwrap();

        // then
        assert_eq!(storage.len().unwrap(), 0);
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn should_share_data_between_clones() {
        // given
        let storage = InMemoryStorage::new();
        let handle = storage.clone();

        // when
        storage.set_item("shared", "yes").unwrap();

        // then
        assert_eq!(handle.get_item("shared").unwrap(), Some("yes".to_string()));
    }

    #[cfg(feature = "test-utils")]
    mod failing {
        use super::super::*;

        #[test]
        fn should_fail_set_until_reset() {
            // given
            let storage = FailingStorage::wrap(Arc::new(InMemoryStorage::new()));
            storage.fail_set(StorageError::Storage("quota exceeded".to_string()));

            // when
            let first = storage.set_item("a", "1");
            let second = storage.set_item("a", "1");
            storage.reset();
            let third = storage.set_item("a", "1");

            // then
            assert!(first.is_err());
            assert!(second.is_err());
            assert!(third.is_ok());
        }

        #[test]
        fn should_fail_get_once() {
            // given
            let inner = Arc::new(InMemoryStorage::with_entries([("a", "1")]));
            let storage = FailingStorage::wrap(inner);
            storage.fail_get_once(StorageError::Storage("io error".to_string()));

            // when
            let first = storage.get_item("a");
            let second = storage.get_item("a");

            // then
            assert_eq!(
                first,
                Err(StorageError::Storage("io error".to_string()))
            );
            assert_eq!(second, Ok(Some("1".to_string())));
        }

        #[test]
        fn should_list_keys_through_indexed_accessors() {
            // given
            let inner = Arc::new(InMemoryStorage::with_entries([("a", "1"), ("b", "2")]));
            let storage = FailingStorage::wrap(inner);

            // when
            let keys = storage.keys().unwrap();

            // then
            assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        }

        #[test]
        fn should_fail_key_listing() {
            // given
            let storage = FailingStorage::wrap(Arc::new(InMemoryStorage::new()));
            storage.fail_list(StorageError::Internal("broken index".to_string()));

            // when
            let result = storage.keys();

            // then
            assert!(matches!(result, Err(StorageError::Internal(_))));
        }
    }
}
