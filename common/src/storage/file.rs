//! File-backed flat storage.
//!
//! [`FileStorage`] keeps the whole key space in memory and mirrors it to a
//! single JSON object on disk after every mutation:
//!
//! ```text
//! { "<key>": "<value>", ... }
//! ```
//!
//! Reads never touch the file. Each rewrite goes to a temporary file in the
//! same directory, which is then renamed over the target, so an interrupted
//! write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use super::{FlatStorage, StorageError, StorageResult};

/// Flat storage persisted as a JSON object file.
pub struct FileStorage {
    path: PathBuf,
    dir: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens the storage file at `path`, creating parent directories as needed.
    ///
    /// A missing file is treated as an empty store; the file is only written
    /// on the first mutation.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Storage(format!(
                        "Failed to create storage directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let data: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::Storage(format!(
                    "Failed to parse storage file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::Storage(format!(
                    "Failed to read storage file '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        tracing::debug!(path = %path.display(), keys = data.len(), "opened file storage");
        Ok(Self {
            path,
            dir,
            data: RwLock::new(data),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `mutate` under the write lock and rewrites the backing file.
    ///
    /// The in-memory map is only updated if the file write succeeds.
    fn mutate<F>(&self, mutate: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire write lock: {}", e)))?;

        let mut next = data.clone();
        mutate(&mut next);

        let contents = serde_json::to_string(&next)
            .map_err(|e| StorageError::Internal(format!("Failed to encode storage: {}", e)))?;
        self.write_atomic(contents.as_bytes())?;

        *data = next;
        Ok(())
    }

    /// Replaces the backing file with `contents` via a sibling temp file.
    fn write_atomic(&self, contents: &[u8]) -> StorageResult<()> {
        let write_err = |e: std::io::Error| {
            StorageError::Storage(format!(
                "Failed to write storage file '{}': {}",
                self.path.display(),
                e
            ))
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(contents).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    fn read<T, F>(&self, read: F) -> StorageResult<T>
    where
        F: FnOnce(&BTreeMap<String, String>) -> T,
    {
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(read(&data))
    }
}

impl FlatStorage for FileStorage {
    #[tracing::instrument(level = "trace", skip_all)]
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.mutate(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.read(|data| data.get(key).cloned())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn remove_item(&self, key: &str) -> StorageResult<()> {
        if !self.read(|data| data.contains_key(key))? {
            return Ok(());
        }
        self.mutate(|data| {
            data.remove(key);
        })
    }

    fn len(&self) -> StorageResult<usize> {
        self.read(|data| data.len())
    }

    fn key(&self, index: usize) -> StorageResult<Option<String>> {
        self.read(|data| data.keys().nth(index).cloned())
    }

    fn clear(&self) -> StorageResult<()> {
        self.mutate(|data| data.clear())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.read(|data| data.keys().cloned().collect())
    }
}
