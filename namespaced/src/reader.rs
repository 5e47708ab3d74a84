//! The [`KadStorage`] backend contract and the [`ReadStream`] it returns.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::Stream;
use futures::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::StoreEntry;

/// Storage backend contract consumed by a DHT storage layer.
///
/// Implementations persist JSON-serializable values under string keys.
/// All runtime failures are returned as values; in particular a missing key
/// is reported as [`Error::NotFound`](crate::Error::NotFound) rather than as
/// an empty result, so a stored `null` is never confused with an absent key.
#[async_trait]
pub trait KadStorage: Send + Sync {
    /// Stores `value` under `key`, overwriting any previous value.
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) without
    /// writing anything if `value` cannot be encoded.
    async fn put<V>(&self, key: &str, value: &V) -> Result<()>
    where
        V: Serialize + ?Sized + Sync;

    /// Reads the value stored under `key`.
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) if nothing is
    /// stored, and [`Error::Deserialization`](crate::Error::Deserialization)
    /// if the stored text is not valid JSON for `V`.
    async fn get<V>(&self, key: &str) -> Result<V>
    where
        V: DeserializeOwned + Send;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn del(&self, key: &str) -> Result<()>;

    /// Returns a stream over every record in the store.
    ///
    /// The stream yields `Ok(entry)` for each decodable record and `Err(_)`
    /// for each record that fails on its own, then ends with `None`.
    /// Ordering is unspecified.
    fn create_read_stream(&self) -> ReadStream;
}

/// One-shot stream of [`StoreEntry`] items.
///
/// Per-entry errors are yielded in place and do not end the stream; the end
/// of the stream is signalled by `None`.
pub struct ReadStream {
    inner: BoxStream<'static, Result<StoreEntry>>,
}

impl ReadStream {
    /// Wraps any sendable stream of entries.
    pub fn new<S>(inner: S) -> Self
    where
        S: Stream<Item = Result<StoreEntry>> + Send + 'static,
    {
        Self {
            inner: Box::pin(inner),
        }
    }

    /// Builds a stream that is driven by a blocking iterator, one item per poll.
    pub(crate) fn from_blocking_iter<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<StoreEntry>> + Send + 'static,
    {
        Self::new(futures::stream::iter(iter))
    }
}

impl Stream for ReadStream {
    type Item = Result<StoreEntry>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for ReadStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadStream").finish_non_exhaustive()
    }
}
