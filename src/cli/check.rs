//! Check command - load every env file without contacting the store.

use serde::Serialize;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::domain::SecretId;
use crate::core::env;
use crate::error::{EnvError, Error, Result};

/// What the check found for one service.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CheckStatus {
    /// Loaded; key names only.
    Ok { keys: Vec<String> },
    Missing,
    Invalid { kind: String, error: String },
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub service: String,
    pub secret_id: SecretId,
    pub path: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

/// Check one service's env file.
pub fn check_service(settings: &Settings, service: &str) -> CheckReport {
    let path = settings.env_file(service);
    let status = match env::load(&path, service, settings.policy()) {
        Ok(payload) => CheckStatus::Ok {
            keys: payload.keys().map(str::to_string).collect(),
        },
        Err(EnvError::NotFound(_)) => CheckStatus::Missing,
        Err(e) => {
            let err = Error::from(e);
            CheckStatus::Invalid {
                kind: err.kind().to_string(),
                error: err.to_string(),
            }
        }
    };

    CheckReport {
        service: service.to_string(),
        secret_id: settings.secret_id(service),
        path: path.display().to_string(),
        status,
    }
}

/// Check every configured service.
///
/// Returns `Ok(false)` if any env file is malformed. Missing files are
/// reported but are not failures.
pub fn execute(settings: &Settings, json: bool) -> Result<bool> {
    let reports: Vec<CheckReport> = settings
        .services()
        .iter()
        .map(|service| check_service(settings, service))
        .collect();
    let invalid = reports
        .iter()
        .filter(|r| matches!(r.status, CheckStatus::Invalid { .. }))
        .count();

    if json {
        output::json(&reports)?;
        return Ok(invalid == 0);
    }

    output::header("Configuration");
    output::kv("mode:   ", settings.mode());
    output::kv("version:", settings.version());
    output::kv("region: ", settings.region());
    output::kv("envs:   ", settings.envs_dir().display());

    for report in &reports {
        output::section(&format!(
            "{} → {}",
            report.service,
            output::secret(report.secret_id.as_str())
        ));
        match &report.status {
            CheckStatus::Ok { keys } if keys.is_empty() => {
                output::dimmed(&format!("{} (no keys)", report.path));
            }
            CheckStatus::Ok { keys } => {
                output::dimmed(&report.path);
                for key in keys {
                    output::list_item(key);
                }
            }
            CheckStatus::Missing => output::warn(&format!("{} not found", report.path)),
            CheckStatus::Invalid { error, .. } => output::error(error),
        }
    }

    println!();
    if invalid == 0 {
        output::success(&format!("{} services checked", reports.len()));
    } else {
        output::error(&format!("{} of {} env files invalid", invalid, reports.len()));
    }

    Ok(invalid == 0)
}
