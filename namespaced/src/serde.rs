//! Key and value encoding for namespaced records.
//!
//! Every record lives in the flat store under an encoded key:
//!
//! ```text
//! Flat key:   | namespace ([A-Za-z0-9]+) | '_' | logical key (any string) |
//! Flat value: | JSON text of the value |
//! ```
//!
//! Namespaces may not contain the separator, so the first `_` of a flat key
//! always ends the namespace. Two namespaces therefore never share a prefix,
//! and logical keys may contain `_` freely.

use ::serde::Serialize;
use ::serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Separator between the namespace and the logical key.
pub const SEPARATOR: char = '_';

/// A validated namespace.
///
/// Holds the encoded key prefix (`<namespace>_`) so that key encoding and
/// prefix matching do not need to rebuild it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Validates `name` and builds a namespace from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNamespace`] if `name` is empty or contains any
    /// character other than ASCII letters and digits.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_valid_namespace(&name) {
            return Err(Error::InvalidNamespace(format!(
                "'{}' must be non-empty and contain only ASCII letters and digits",
                name
            )));
        }
        let mut prefix = name;
        prefix.push(SEPARATOR);
        Ok(Self { prefix })
    }

    /// Returns the namespace name.
    pub fn as_str(&self) -> &str {
        &self.prefix[..self.prefix.len() - SEPARATOR.len_utf8()]
    }

    /// Returns the flat key prefix shared by every record in this namespace.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` if `name` can be used as a namespace.
pub fn is_valid_namespace(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Encodes a logical key by prepending the namespace prefix.
pub fn encode_key(namespace: &Namespace, key: &str) -> String {
    let mut encoded = String::with_capacity(namespace.prefix().len() + key.len());
    encoded.push_str(namespace.prefix());
    encoded.push_str(key);
    encoded
}

/// Decodes a flat key by stripping the namespace prefix.
///
/// Returns `None` if the key belongs to another namespace or to no namespace
/// at all.
pub fn decode_key<'a>(namespace: &Namespace, encoded: &'a str) -> Option<&'a str> {
    encoded.strip_prefix(namespace.prefix())
}

/// Encodes a value as JSON text.
pub fn encode_value<V>(value: &V) -> Result<String>
where
    V: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decodes JSON text into a value.
pub fn decode_value<V>(raw: &str) -> Result<V>
where
    V: DeserializeOwned,
{
    serde_json::from_str(raw).map_err(|e| Error::Deserialization(e.to_string()))
}
