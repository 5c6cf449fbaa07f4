//! Configuration loading.
//!
//! Settings come from three layers, later ones winning: an optional
//! `secretsync.toml`, process environment variables (after `.env` has been
//! loaded into the environment), and command-line overrides. The result is
//! an immutable [`Settings`] handed to the reconciler.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants::{self, vars};
use crate::core::domain::{Mode, SecretId};
use crate::core::naming;
use crate::core::policy::CredentialPolicy;
use crate::core::reconcile::Strategy;
use crate::core::store::RetryPolicy;
use crate::error::{ConfigError, Result};

/// Contents of `secretsync.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub mode: Option<String>,
    pub version: Option<String>,
    pub region: Option<String>,
    pub services: Option<Vec<String>>,
    pub envs_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub strategy: Option<Strategy>,
    pub timeout_secs: Option<u64>,
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub policy: Option<PolicyConfig>,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

/// `[policy]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub denied: Option<Vec<String>>,
    pub passthrough: Option<Vec<String>>,
}

/// `[retry]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file cannot be read, or
    /// `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Load `secretsync.toml` from `dir` if present.
    ///
    /// # Errors
    ///
    /// Same as [`FileConfig::load`]; a missing file is not an error.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(constants::CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!("no config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Command-line overrides. `None`/empty means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub mode: Option<Mode>,
    pub version: Option<String>,
    pub region: Option<String>,
    pub services: Vec<String>,
    pub envs_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub strategy: Option<Strategy>,
}

/// Static store credentials.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: Zeroizing<String>,
    pub session_token: Option<Zeroizing<String>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolved, validated run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    mode: Mode,
    version: String,
    region: String,
    services: Vec<String>,
    envs_dir: PathBuf,
    policy: CredentialPolicy,
    jobs: usize,
    strategy: Strategy,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    endpoint_url: Option<String>,
    credentials: Option<Credentials>,
}

impl Settings {
    /// Settings with defaults for everything but mode and version.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `version` is not usable in a
    /// secret name.
    pub fn new(mode: Mode, version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        validate_version(&version)?;

        Ok(Self {
            mode,
            version,
            region: constants::DEFAULT_REGION.to_string(),
            services: constants::DEFAULT_SERVICES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            envs_dir: PathBuf::from(constants::ENVS_DIR),
            policy: CredentialPolicy::default(),
            jobs: 1,
            strategy: Strategy::default(),
            retry: RetryPolicy::default(),
            timeout: None,
            endpoint_url: None,
            credentials: None,
        })
    }

    /// Merge the config file, environment variables and overrides.
    ///
    /// `var` looks up an environment variable; empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when mode or version is absent from
    /// every layer, and `ConfigError::InvalidValue` for unusable values.
    /// Missing credentials are not an error here; see
    /// [`Settings::credentials`].
    pub fn resolve<F>(file: FileConfig, var: F, overrides: Overrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        let mode = match overrides.mode {
            Some(mode) => mode,
            None => var(vars::MODE)
                .or(file.mode)
                .ok_or(ConfigError::Missing { var: vars::MODE })?
                .parse()?,
        };

        let version = overrides
            .version
            .or_else(|| var(vars::VERSION))
            .or(file.version)
            .ok_or(ConfigError::Missing { var: vars::VERSION })?;

        let mut settings = Self::new(mode, version.trim())?;

        if let Some(region) = overrides
            .region
            .or_else(|| var(vars::REGION))
            .or(file.region)
        {
            settings.region = region;
        }

        let services = if overrides.services.is_empty() {
            file.services
        } else {
            Some(overrides.services)
        };
        if let Some(services) = services {
            settings = settings.with_services(services)?;
        }

        if let Some(dir) = overrides.envs_dir.or(file.envs_dir) {
            settings.envs_dir = dir;
        }

        if let Some(jobs) = overrides.jobs.or(file.jobs) {
            settings = settings.with_jobs(jobs)?;
        }

        if let Some(strategy) = overrides.strategy.or(file.strategy) {
            settings.strategy = strategy;
        }

        if let Some(policy) = file.policy {
            let denied = policy.denied.unwrap_or_else(|| {
                constants::DENIED_KEYS.iter().map(|s| s.to_string()).collect()
            });
            let passthrough = policy.passthrough.unwrap_or_else(|| {
                constants::PASSTHROUGH_SERVICES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });
            settings.policy = CredentialPolicy::new(denied, passthrough);
        }

        if let Some(retry) = file.retry {
            let defaults = RetryPolicy::default();
            settings.retry = RetryPolicy::new(
                retry.max_attempts.unwrap_or(defaults.max_attempts),
                retry
                    .base_delay_ms
                    .map_or(defaults.base_delay, Duration::from_millis),
                retry
                    .max_delay_ms
                    .map_or(defaults.max_delay, Duration::from_millis),
            );
            if settings.retry.max_attempts == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "retry.max_attempts",
                    reason: "must be at least 1".to_string(),
                }
                .into());
            }
        }

        settings.timeout = file.timeout_secs.map(Duration::from_secs);
        settings.endpoint_url = var(vars::ENDPOINT_URL).or(file.endpoint_url);

        if let (Some(access_key_id), Some(secret_access_key)) =
            (var(vars::ACCESS_KEY_ID), var(vars::SECRET_ACCESS_KEY))
        {
            settings.credentials = Some(Credentials {
                access_key_id,
                secret_access_key: Zeroizing::new(secret_access_key),
                session_token: var(vars::SESSION_TOKEN).map(Zeroizing::new),
            });
        }

        debug!(
            mode = %settings.mode,
            version = %settings.version,
            region = %settings.region,
            services = settings.services.len(),
            jobs = settings.jobs,
            has_credentials = settings.credentials.is_some(),
            "settings resolved"
        );

        Ok(settings)
    }

    /// Replace the service list.
    ///
    /// Duplicates are dropped, keeping the first occurrence, so no two
    /// workflows ever target the same secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty list or a service
    /// name that cannot be used as a path segment.
    pub fn with_services<I, S>(mut self, services: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for service in services {
            let service = service.into().trim().to_string();
            validate_service(&service)?;
            if seen.insert(service.clone()) {
                unique.push(service);
            } else {
                warn!(service = %service, "duplicate service ignored");
            }
        }

        if unique.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "services",
                reason: "at least one service is required".to_string(),
            }
            .into());
        }

        self.services = unique;
        Ok(self)
    }

    /// Set the worker count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `jobs` is zero.
    pub fn with_jobs(mut self, jobs: usize) -> Result<Self> {
        if jobs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "jobs",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        self.jobs = jobs;
        Ok(self)
    }

    pub fn with_envs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.envs_dir = dir.into();
        self
    }

    pub fn with_policy(mut self, policy: CredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    pub fn envs_dir(&self) -> &Path {
        &self.envs_dir
    }

    pub fn policy(&self) -> &CredentialPolicy {
        &self.policy
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    /// Store credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent variable.
    pub fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            ConfigError::Missing {
                var: vars::ACCESS_KEY_ID,
            }
            .into()
        })
    }

    /// Env file for a service under these settings.
    pub fn env_file(&self, service: &str) -> PathBuf {
        naming::env_file(&self.envs_dir, service, &self.mode)
    }

    /// Secret name for a service under these settings.
    pub fn secret_id(&self, service: &str) -> SecretId {
        naming::resolve(service, &self.version, &self.mode)
    }
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(ConfigError::Missing { var: vars::VERSION }.into());
    }
    if version.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::InvalidValue {
            field: "version",
            reason: format!("'{}' cannot contain whitespace or '/'", version),
        }
        .into());
    }
    Ok(())
}

fn validate_service(service: &str) -> Result<()> {
    let invalid = service.is_empty()
        || service == "."
        || service == ".."
        || service
            .chars()
            .any(|c| c.is_whitespace() || c == '/' || c == '\\');
    if invalid {
        return Err(ConfigError::InvalidValue {
            field: "services",
            reason: format!("'{}' is not a valid service name", service),
        }
        .into());
    }
    Ok(())
}
