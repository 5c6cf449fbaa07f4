//! Credential filtering policy.
//!
//! Infrastructure credentials found in a service's env file are withheld
//! from its payload unless the service is on the passthrough list.

use std::collections::BTreeSet;

use crate::core::constants::{DENIED_KEYS, PASSTHROUGH_SERVICES};

/// Denylist of credential keys plus the services allowed to receive them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPolicy {
    denied: BTreeSet<String>,
    passthrough: BTreeSet<String>,
}

impl CredentialPolicy {
    pub fn new<D, P>(denied: D, passthrough: P) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            denied: denied.into_iter().map(Into::into).collect(),
            passthrough: passthrough.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `key` may be forwarded for `service`.
    pub fn permits(&self, service: &str, key: &str) -> bool {
        !self.denied.contains(key) || self.passthrough.contains(service)
    }

    pub fn is_passthrough(&self, service: &str) -> bool {
        self.passthrough.contains(service)
    }

    pub fn denied(&self) -> impl Iterator<Item = &str> {
        self.denied.iter().map(String::as_str)
    }
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self::new(DENIED_KEYS.iter().copied(), PASSTHROUGH_SERVICES.iter().copied())
    }
}
