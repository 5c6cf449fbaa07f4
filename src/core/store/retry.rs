//! Per-call retry policy for secret stores.
//!
//! [`Retrying`] wraps any [`SecretStore`] and re-issues a call while it
//! fails with a retriable error, sleeping on a capped Fibonacci schedule
//! between attempts. Each call is retried on its own; a retried `create` is
//! never turned into an `update`.

use std::time::Duration;

use tracing::warn;

use super::{SecretStore, StoreResult};
use crate::core::domain::SecretId;
use crate::error::{StoreError, StoreOp};

/// Retry limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Single attempt, no sleeping.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200), Duration::from_secs(5))
    }
}

/// Fibonacci backoff: `base, base, 2*base, 3*base, 5*base, ...`, capped at
/// `max`.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    prev: Duration,
    current: Duration,
    max: Duration,
}

impl FibonacciBackoff {
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            prev: Duration::ZERO,
            current: base,
            max,
        }
    }

    /// Next delay in the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current.min(self.max);
        let next = self.prev.saturating_add(self.current);
        self.prev = self.current;
        self.current = next;
        delay
    }
}

/// Store wrapper that retries transient failures.
#[derive(Debug)]
pub struct Retrying<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: SecretStore> Retrying<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn call<T>(
        &self,
        op: StoreOp,
        id: &SecretId,
        mut attempt_fn: impl FnMut() -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut backoff = FibonacciBackoff::new(self.policy.base_delay, self.policy.max_delay);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match attempt_fn() {
                Err(e) if e.is_retriable() => {
                    if attempt >= max_attempts {
                        return Err(StoreError::Exhausted {
                            op,
                            id: id.to_string(),
                            attempts: attempt,
                            source: Box::new(e),
                        });
                    }

                    let delay = backoff.next_delay();
                    warn!(
                        store = self.inner.name(),
                        %op,
                        secret_id = %id,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "retrying store call"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl<S: SecretStore> SecretStore for Retrying<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn exists(&self, id: &SecretId) -> StoreResult<bool> {
        self.call(StoreOp::Exists, id, || self.inner.exists(id))
    }

    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        self.call(StoreOp::Create, id, || self.inner.create(id, value))
    }

    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        self.call(StoreOp::Update, id, || self.inner.update(id, value))
    }
}
