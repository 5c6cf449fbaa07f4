//! Per-service create-or-update workflow.
//!
//! For each configured service: locate its env file, load and filter it,
//! resolve the secret name, then create or update the secret. Every service
//! ends up with exactly one [`Outcome`]; only configuration problems abort a
//! run, and those are caught before the reconciler is built.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use serde::Deserialize;
use tracing::{debug, info, info_span, warn};

use crate::core::config::Settings;
use crate::core::domain::{Outcome, RunSummary, SecretId, SecretPayload, ServiceReport};
use crate::core::env;
use crate::core::store::SecretStore;
use crate::error::{EnvError, Error, StoreError};

/// How the reconciler decides between create and update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Probe with `exists`, then create or update.
    #[default]
    Probe,
    /// Attempt `create` and fall back to `update` if the secret exists.
    /// One store round-trip fewer on first sync, and no probe-then-act gap.
    CreateFirst,
}

impl std::str::FromStr for Strategy {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "probe" => Ok(Self::Probe),
            "create-first" => Ok(Self::CreateFirst),
            other => Err(crate::error::ConfigError::InvalidValue {
                field: "strategy",
                reason: format!("unknown strategy '{}'; expected probe or create-first", other),
            }),
        }
    }
}

/// Which write landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Write {
    Created,
    Updated,
}

/// Drives the sync of every configured service against one store.
#[derive(Debug)]
pub struct Reconciler<'a, S: ?Sized> {
    settings: &'a Settings,
    store: &'a S,
    dry_run: bool,
}

impl<'a, S: SecretStore + ?Sized> Reconciler<'a, S> {
    pub fn new(settings: &'a Settings, store: &'a S) -> Self {
        Self {
            settings,
            store,
            dry_run: false,
        }
    }

    /// Probe only; never call `create` or `update`.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sync every configured service.
    ///
    /// Reports come back in service-list order whatever the worker count.
    pub fn run(&self) -> RunSummary {
        let started_at = chrono::Utc::now();
        let services = self.settings.services();
        let jobs = self.settings.jobs().min(services.len()).max(1);

        info!(
            store = self.store.name(),
            services = services.len(),
            jobs,
            dry_run = self.dry_run,
            "starting sync"
        );

        let reports = if jobs == 1 {
            services.iter().map(|s| self.sync_service(s)).collect()
        } else {
            self.run_pool(services, jobs)
        };

        let summary = RunSummary::new(self.dry_run, started_at, reports);
        info!(
            created = summary.counts.created,
            updated = summary.counts.updated,
            skipped = summary.counts.skipped,
            failed = summary.counts.failed,
            "sync finished"
        );
        summary
    }

    /// Bounded worker pool. Workers pull the next index from a shared
    /// counter and send `(index, report)` to this thread, which is the only
    /// writer of the result list.
    fn run_pool(&self, services: &[String], jobs: usize) -> Vec<ServiceReport> {
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();

        std::thread::scope(|scope| {
            for _ in 0..jobs {
                let tx = tx.clone();
                let next = &next;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(service) = services.get(index) else {
                        break;
                    };
                    if tx.send((index, self.sync_service(service))).is_err() {
                        break;
                    }
                });
            }
        });
        drop(tx);

        let mut indexed: Vec<(usize, ServiceReport)> = rx.into_iter().collect();
        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, report)| report).collect()
    }

    /// Sync one service. Never fails; problems become `Outcome::Failed`.
    pub fn sync_service(&self, service: &str) -> ServiceReport {
        let secret_id = self.settings.secret_id(service);
        let span = info_span!("sync", service, secret_id = %secret_id);
        let _guard = span.enter();

        let outcome = self.sync_inner(service, &secret_id);
        match &outcome {
            Outcome::Created { .. } | Outcome::Updated { .. } => {
                info!(outcome = outcome.label(), dry_run = self.dry_run, "secret synced");
            }
            Outcome::Skipped { path } => warn!(path = %path, "env file not found, skipping"),
            Outcome::Failed { error, .. } => warn!(error = %error, "sync failed"),
        }

        ServiceReport {
            service: service.to_string(),
            secret_id,
            outcome,
        }
    }

    fn sync_inner(&self, service: &str, secret_id: &SecretId) -> Outcome {
        let path = self.settings.env_file(service);

        let payload = match env::load(&path, service, self.settings.policy()) {
            Ok(payload) => payload,
            Err(EnvError::NotFound(path)) => {
                return Outcome::Skipped {
                    path: path.display().to_string(),
                }
            }
            Err(e) => return Outcome::failed(&e.into()),
        };

        match self.push(secret_id, &payload) {
            Ok((Write::Created, keys, fingerprint)) => Outcome::Created { keys, fingerprint },
            Ok((Write::Updated, keys, fingerprint)) => Outcome::Updated { keys, fingerprint },
            Err(e) => Outcome::failed(&e),
        }
    }

    fn push(
        &self,
        id: &SecretId,
        payload: &SecretPayload,
    ) -> Result<(Write, usize, String), Error> {
        let body = payload.to_secret_string()?;
        let fingerprint = SecretPayload::fingerprint(&body);
        debug!(keys = payload.len(), fingerprint = %fingerprint, "payload ready");

        let write = if self.dry_run {
            if self.store.exists(id)? {
                Write::Updated
            } else {
                Write::Created
            }
        } else {
            match self.settings.strategy() {
                Strategy::Probe => self.probe_then_write(id, &body)?,
                Strategy::CreateFirst => self.create_or_update(id, &body)?,
            }
        };

        Ok((write, payload.len(), fingerprint))
    }

    /// `exists` then the matching write. If another writer got in between,
    /// the other write is tried once.
    fn probe_then_write(&self, id: &SecretId, body: &str) -> Result<Write, StoreError> {
        if self.store.exists(id)? {
            match self.store.update(id, body) {
                Err(StoreError::NotFound { .. }) => {
                    warn!("secret vanished after probe, creating");
                    self.store.create(id, body).map(|()| Write::Created)
                }
                other => other.map(|()| Write::Updated),
            }
        } else {
            self.create_or_update(id, body)
        }
    }

    fn create_or_update(&self, id: &SecretId, body: &str) -> Result<Write, StoreError> {
        match self.store.create(id, body) {
            Err(StoreError::AlreadyExists { .. }) => {
                debug!("secret already exists, updating");
                self.store.update(id, body).map(|()| Write::Updated)
            }
            other => other.map(|()| Write::Created),
        }
    }
}
