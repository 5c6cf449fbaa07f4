//! Naming convention for secrets and env files.
//!
//! Both names are pure functions of (service, version, mode) so re-runs
//! always target the same secret and read the same file.

use std::path::{Path, PathBuf};

use crate::core::constants::ENV_FILE;
use crate::core::domain::{Mode, SecretId};

/// Remote secret name for a service: `{service}-{version}` in production,
/// `{service}-{version}-{mode}` otherwise.
pub fn resolve(service: &str, version: &str, mode: &Mode) -> SecretId {
    match mode.suffix() {
        None => SecretId::new(format!("{}-{}", service, version)),
        Some(suffix) => SecretId::new(format!("{}-{}-{}", service, version, suffix)),
    }
}

/// Env file for a service: `{envs_dir}/{service}/.env` in production,
/// `{envs_dir}/{service}/.{mode}.env` otherwise.
pub fn env_file(envs_dir: &Path, service: &str, mode: &Mode) -> PathBuf {
    let file = match mode.suffix() {
        None => ENV_FILE.to_string(),
        Some(suffix) => format!(".{}{}", suffix, ENV_FILE),
    };
    envs_dir.join(service).join(file)
}
