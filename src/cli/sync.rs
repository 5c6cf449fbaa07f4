//! Sync command - create or update every configured service's secret.

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::domain::{Outcome, RunSummary};
use crate::core::reconcile::Reconciler;
use crate::error::Result;

/// Sync every configured service.
///
/// Returns `Ok(false)` if any service failed.
pub fn execute(settings: &Settings, dry_run: bool, json: bool) -> Result<bool> {
    // Fail before touching anything if the store cannot be reached at all.
    settings.credentials()?;
    info!(dry_run, region = settings.region(), "running sync");

    let store = backend::connect(settings)?;
    let summary = Reconciler::new(settings, &store).dry_run(dry_run).run();

    if json {
        output::json(&summary)?;
    } else {
        render(&summary);
    }

    Ok(!summary.has_failures())
}

/// Print a human-readable run summary.
pub fn render(summary: &RunSummary) {
    let width = summary
        .services
        .iter()
        .map(|r| r.service.len())
        .max()
        .unwrap_or(0);

    if summary.dry_run {
        output::section("Services (dry run, nothing written)");
    } else {
        output::section("Services");
    }

    for report in &summary.services {
        let detail = match &report.outcome {
            Outcome::Created { keys, fingerprint } | Outcome::Updated { keys, fingerprint } => {
                format!(
                    "{}  {} keys  {}",
                    output::secret(report.secret_id.as_str()),
                    keys,
                    fingerprint
                )
            }
            Outcome::Skipped { path } => format!("{} not found", output::path(path)),
            Outcome::Failed { error, .. } => error.clone(),
        };
        println!(
            "  {} {:<width$}  {}",
            output::status(report.outcome.label()),
            report.service,
            detail,
            width = width
        );
    }

    output::rule();

    let counts = &summary.counts;
    let line = format!(
        "{} created, {} updated, {} skipped, {} failed in {}ms",
        counts.created, counts.updated, counts.skipped, counts.failed, summary.duration_ms
    );
    if summary.has_failures() {
        output::warn(&line);
    } else {
        output::success(&line);
    }
}

#[cfg(feature = "aws")]
mod backend {
    use crate::core::config::Settings;
    use crate::core::store::aws::AwsSecretsManager;
    use crate::core::store::Retrying;
    use crate::error::Result;

    pub fn connect(settings: &Settings) -> Result<Retrying<AwsSecretsManager>> {
        let store = AwsSecretsManager::connect(settings)?;
        Ok(Retrying::new(store, settings.retry().clone()))
    }
}

#[cfg(not(feature = "aws"))]
mod backend {
    use crate::core::config::Settings;
    use crate::core::store::MemoryStore;
    use crate::error::{ConfigError, Result};

    pub fn connect(_settings: &Settings) -> Result<MemoryStore> {
        Err(ConfigError::NoBackend.into())
    }
}
