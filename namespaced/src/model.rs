//! Data types for namespaced store operations.

use serde_json::Value;

/// A record emitted by [`ReadStream`](crate::ReadStream).
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEntry {
    /// The logical key, with the namespace prefix stripped.
    pub key: String,
    /// The decoded JSON value.
    pub value: Value,
}
