//! Run summary types.
//!
//! One [`ServiceReport`] per configured service, in service-list order.

use serde::Serialize;

use super::SecretId;
use crate::error::Error;

/// What happened to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// The secret did not exist and was created.
    Created { keys: usize, fingerprint: String },
    /// The secret existed and its value was overwritten.
    Updated { keys: usize, fingerprint: String },
    /// The env file is missing; the store was not contacted.
    Skipped { path: String },
    /// Parsing or a store call failed.
    Failed { kind: String, error: String },
}

impl Outcome {
    pub fn failed(err: &Error) -> Self {
        Self::Failed {
            kind: err.kind().to_string(),
            error: err.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Updated { .. } => "updated",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one service's sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceReport {
    pub service: String,
    pub secret_id: SecretId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Per-status tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.failed
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Set when no create/update call was made.
    pub dry_run: bool,
    /// RFC 3339 start timestamp.
    pub started_at: String,
    pub duration_ms: u64,
    pub counts: Counts,
    pub services: Vec<ServiceReport>,
}

impl RunSummary {
    pub fn new(
        dry_run: bool,
        started_at: chrono::DateTime<chrono::Utc>,
        services: Vec<ServiceReport>,
    ) -> Self {
        let mut counts = Counts::default();
        for report in &services {
            match report.outcome {
                Outcome::Created { .. } => counts.created += 1,
                Outcome::Updated { .. } => counts.updated += 1,
                Outcome::Skipped { .. } => counts.skipped += 1,
                Outcome::Failed { .. } => counts.failed += 1,
            }
        }

        let elapsed = chrono::Utc::now().signed_duration_since(started_at);

        Self {
            dry_run,
            started_at: started_at.to_rfc3339(),
            duration_ms: u64::try_from(elapsed.num_milliseconds()).unwrap_or(0),
            counts,
            services,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.counts.failed > 0
    }

    /// Report for a service, if it was part of the run.
    pub fn get(&self, service: &str) -> Option<&ServiceReport> {
        self.services.iter().find(|r| r.service == service)
    }
}
