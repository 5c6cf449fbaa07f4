//! Environment file loading.
//!
//! Reads a service's dotenv-style file into a [`SecretPayload`], applying
//! the [`CredentialPolicy`] on the way.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, trace};

use crate::core::domain::SecretPayload;
use crate::core::policy::CredentialPolicy;
use crate::error::EnvError;

/// Load and filter a service's env file.
///
/// Skips blank lines and lines whose first non-whitespace character is `#`.
/// Every other line must be `KEY=VALUE`; only the first `=` splits, so values
/// may contain `=`. Keys and values are trimmed and every quote character
/// (`'` or `"`) is removed from the value, including inner ones. When a key
/// repeats, the last value wins.
///
/// # Errors
///
/// Returns `EnvError::NotFound` if the file does not exist,
/// `EnvError::Parse` for a line without `=`, and `EnvError::Read` for any
/// other I/O failure.
pub fn load(
    path: impl AsRef<Path>,
    service: &str,
    policy: &CredentialPolicy,
) -> Result<SecretPayload, EnvError> {
    let path = path.as_ref();
    debug!(path = %path.display(), service, "loading env file");

    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EnvError::NotFound(path.to_path_buf()),
        _ => EnvError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse(&contents, path, service, policy)
}

/// Parse env file contents. `path` is only used in error messages.
///
/// # Errors
///
/// Returns `EnvError::Parse` for the first line without `=`.
pub fn parse(
    contents: &str,
    path: &Path,
    service: &str,
    policy: &CredentialPolicy,
) -> Result<SecretPayload, EnvError> {
    let mut payload = SecretPayload::new();
    let mut withheld = 0usize;

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = line.split_once('=').ok_or_else(|| EnvError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
        })?;
        let key = key.trim();

        if !policy.permits(service, key) {
            trace!(service, key, "withholding credential key");
            withheld += 1;
            continue;
        }

        payload.insert(key, strip_quotes(value.trim()));
    }

    debug!(
        service,
        keys = payload.len(),
        withheld,
        "env file parsed"
    );

    Ok(payload)
}

/// Remove every quote character, not just enclosing pairs.
fn strip_quotes(value: &str) -> String {
    value.replace(['\'', '"'], "")
}
