//! Secret identifier type.
//!
//! The name a service's payload is stored under in the remote store.

use serde::Serialize;

/// Remote secret name, `{service}-{version}[-{mode}]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SecretId(String);

impl SecretId {
    /// Wrap an already-resolved name.
    ///
    /// Prefer [`crate::core::naming::resolve`], which applies the naming
    /// convention.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SecretId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SecretId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
