//! Secret payload type.
//!
//! The filtered key/value mapping pushed to the store for one service.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Filtered key/value pairs from one env file.
///
/// Keys are kept sorted so the serialized form is canonical: the same
/// entries always produce byte-identical output, whatever order they were
/// read in.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SecretPayload(BTreeMap<String, String>);

impl SecretPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any earlier value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Key names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical store representation: a JSON object with sorted keys and
    /// four-space indentation.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, which cannot occur for string maps in
    /// practice.
    pub fn to_secret_string(&self) -> serde_json::Result<String> {
        let mut buf = Vec::with_capacity(64 * self.0.len().max(1));
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Short SHA-256 fingerprint of a serialized payload.
    ///
    /// Lets logs and summaries show whether content changed between runs
    /// without exposing any value.
    pub fn fingerprint(serialized: &str) -> String {
        let digest = Sha256::digest(serialized.as_bytes());
        let hex = format!("{:x}", digest);
        hex[..12].to_string()
    }
}

impl FromIterator<(String, String)> for SecretPayload {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Values are never printed; only key names are.
impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}
