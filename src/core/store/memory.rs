//! In-process secret store.
//!
//! Keeps secrets in a map and records every call, so tests can assert both
//! the final state and the exact call sequence.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{SecretStore, StoreResult};
use crate::core::domain::SecretId;
use crate::error::StoreError;

/// A call made against a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Exists(String),
    Create(String),
    Update(String),
}

/// Map-backed store with a call log.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: Mutex<BTreeMap<String, String>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a secret without recording a call.
    pub fn with_secret(self, id: impl Into<String>, value: impl Into<String>) -> Self {
        lock(&self.secrets).insert(id.into(), value.into());
        self
    }

    /// Current value of a secret.
    pub fn get(&self, id: &str) -> Option<String> {
        lock(&self.secrets).get(id).cloned()
    }

    /// Names of all stored secrets, sorted.
    pub fn ids(&self) -> Vec<String> {
        lock(&self.secrets).keys().cloned().collect()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    /// Calls that targeted one secret, in order.
    pub fn calls_for(&self, id: &str) -> Vec<StoreCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| match call {
                StoreCall::Exists(i) | StoreCall::Create(i) | StoreCall::Update(i) => i == id,
            })
            .cloned()
            .collect()
    }

    fn record(&self, call: StoreCall) {
        lock(&self.calls).push(call);
    }
}

impl SecretStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn exists(&self, id: &SecretId) -> StoreResult<bool> {
        self.record(StoreCall::Exists(id.to_string()));
        Ok(lock(&self.secrets).contains_key(id.as_str()))
    }

    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        self.record(StoreCall::Create(id.to_string()));
        let mut secrets = lock(&self.secrets);
        if secrets.contains_key(id.as_str()) {
            return Err(StoreError::AlreadyExists { id: id.to_string() });
        }
        secrets.insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        self.record(StoreCall::Update(id.to_string()));
        match lock(&self.secrets).get_mut(id.as_str()) {
            Some(stored) => {
                *stored = value.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }
}

// A panic while holding the lock cannot leave the map half-written, so a
// poisoned lock is still safe to use.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
