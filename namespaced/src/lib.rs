//! Namespaced KV - JSON records over a flat string key-value store.
//!
//! This crate provides the storage backend a DHT node uses to persist values
//! locally. It is built on a synchronous, string-only, flat key-value
//! primitive (see [`common::FlatStorage`]) and scopes every record to a
//! namespace so that several stores can share one flat key space.
//!
//! # Architecture
//!
//! [`NamespacedStore`] is a thin wrapper that adds key encoding and JSON
//! value encoding to flat storage operations. Logical keys are prefixed with
//! `<namespace>_` before storage and the prefix is stripped when reading
//! back. Values are stored as JSON text.
//!
//! # Key Concepts
//!
//! - **KadStorage**: The backend contract (`put`, `get`, `del`,
//!   `create_read_stream`) consumed by DHT storage layers.
//! - **NamespacedStore**: The `KadStorage` implementation over flat storage.
//! - **ReadStream**: A one-shot stream over every record of a namespace.
//!   Records that fail to decode are yielded as errors without ending the
//!   stream.
//! - **Error::NotFound**: A missing key is an error, never an empty value,
//!   so a stored `null` cannot be confused with an absent key.
//!
//! # Example
//!
//! ```ignore
//! use namespaced::{Config, KadStorage, NamespacedStore};
//! use futures::StreamExt;
//!
//! let store = NamespacedStore::open(Config {
//!     namespace: "dht".to_string(),
//!     ..Default::default()
//! })?;
//!
//! // Write data
//! store.put("a", "a1").await?;
//! store.put("b", &false).await?;
//!
//! // Read data
//! let value: bool = store.get("b").await?;
//! assert!(!value);
//!
//! // Stream every record in the namespace
//! let mut stream = store.create_read_stream();
//! while let Some(item) = stream.next().await {
//!     match item {
//!         Ok(entry) => println!("{}: {}", entry.key, entry.value),
//!         Err(e) => eprintln!("skipped record: {}", e),
//!     }
//! }
//!
//! // Delete data
//! store.del("a").await?;
//! ```

mod config;
mod error;
mod model;
mod reader;
mod serde;
mod storage;
mod store;

pub use config::Config;
pub use crate::serde::{Namespace, SEPARATOR, is_valid_namespace};
pub use error::{Error, Result};
pub use model::StoreEntry;
pub use reader::{KadStorage, ReadStream};
pub use store::NamespacedStore;
