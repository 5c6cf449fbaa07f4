//! Error types.
//!
//! Each concern gets its own enum; [`Error`] folds them together so callers
//! can use `?` across module boundaries.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize secret payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short, stable label for the error class.
    ///
    /// Used in JSON summaries so tooling can group failures without parsing
    /// messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Env(EnvError::NotFound(_)) => "file-not-found",
            Self::Env(EnvError::Parse { .. }) => "parse",
            Self::Env(EnvError::Read { .. }) => "read",
            Self::Store(e) => e.kind(),
            Self::Serialize(_) => "serialize",
            Self::Io(_) => "io",
        }
    }
}

/// Configuration errors. All of these abort the run before any service is
/// touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting: {var}")]
    Missing { var: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no secret store backend compiled in (rebuild with: cargo install secretsync --features aws)")]
    NoBackend,
}

/// Environment file errors.
#[derive(Error, Debug)]
pub enum EnvError {
    /// The file does not exist. Callers treat this as a skip.
    #[error("env file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read env file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-comment line without `=`. The line content is deliberately not
    /// carried since it may hold a secret.
    #[error("malformed line {line} in {}: expected KEY=VALUE", .path.display())]
    Parse { path: PathBuf, line: usize },
}

/// The store call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Exists,
    Create,
    Update,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exists => "exists",
            Self::Create => "create",
            Self::Update => "update",
        })
    }
}

/// Secret store errors.
///
/// `NotFound` and `AlreadyExists` are signals the reconciler branches on.
/// `Auth`, `Throttled`, `Network` and `Timeout` are transient and retried by
/// the store's retry policy; once the policy gives up they are wrapped in
/// `Exhausted`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret {id} does not exist")]
    NotFound { id: String },

    #[error("secret {id} already exists")]
    AlreadyExists { id: String },

    #[error("{op} {id}: access denied: {message}")]
    Auth {
        op: StoreOp,
        id: String,
        message: String,
    },

    #[error("{op} {id}: throttled: {message}")]
    Throttled {
        op: StoreOp,
        id: String,
        message: String,
    },

    #[error("{op} {id}: network error: {message}")]
    Network {
        op: StoreOp,
        id: String,
        message: String,
    },

    #[error("{op} {id}: timed out: {message}")]
    Timeout {
        op: StoreOp,
        id: String,
        message: String,
    },

    #[error("{op} {id} failed: {message}")]
    Failure {
        op: StoreOp,
        id: String,
        message: String,
    },

    #[error("{op} {id} gave up after {attempts} attempts: {source}")]
    Exhausted {
        op: StoreOp,
        id: String,
        attempts: u32,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Whether another attempt of the same call may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. } | Self::Throttled { .. } | Self::Network { .. } | Self::Timeout { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "store-not-found",
            Self::AlreadyExists { .. } => "store-exists",
            Self::Auth { .. }
            | Self::Throttled { .. }
            | Self::Network { .. }
            | Self::Timeout { .. } => "store-transient",
            Self::Failure { .. } | Self::Exhausted { .. } => "store-failure",
        }
    }
}
