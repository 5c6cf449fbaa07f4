//! Secret store abstraction.
//!
//! The reconciler only talks to a [`SecretStore`]; which backend sits behind
//! it is decided at startup.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Map backend errors onto [`StoreError`]: "does not exist" must become
//!    `NotFound` (or `Ok(false)` from `exists`), and transient failures must
//!    use the retriable variants
//! 3. Feature-gate if it pulls in an SDK
//! 4. Re-export from this module

mod memory;
mod retry;

#[cfg(feature = "aws")]
pub mod aws;

pub use memory::{MemoryStore, StoreCall};
pub use retry::{FibonacciBackoff, RetryPolicy, Retrying};

use crate::core::domain::SecretId;
use crate::error::StoreError;

/// Result of a store call.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Remote secret store keyed by [`SecretId`].
///
/// Values are opaque strings. Both writes replace the whole value; nothing
/// is merged with what the store already holds.
pub trait SecretStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Whether a secret exists.
    ///
    /// # Errors
    ///
    /// A missing secret is `Ok(false)`, never an error. Auth, throttling,
    /// network and timeout failures return their own `StoreError` variants.
    fn exists(&self, id: &SecretId) -> StoreResult<bool>;

    /// Create a new secret.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the secret is already present.
    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()>;

    /// Overwrite an existing secret's value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the secret does not exist.
    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn exists(&self, id: &SecretId) -> StoreResult<bool> {
        (**self).exists(id)
    }

    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        (**self).create(id, value)
    }

    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        (**self).update(id, value)
    }
}

impl<S: SecretStore + ?Sized> SecretStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn exists(&self, id: &SecretId) -> StoreResult<bool> {
        (**self).exists(id)
    }

    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        (**self).create(id, value)
    }

    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        (**self).update(id, value)
    }
}
