//! Constants used throughout secretsync.
//!
//! Centralizes magic strings and default configuration values.

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "secretsync.toml";

/// Directory holding one sub-directory of env files per service.
pub const ENVS_DIR: &str = "envs";

/// Env file name for production; other modes use `.{mode}.env`.
pub const ENV_FILE: &str = ".env";

/// Mode label that contributes no suffix to file or secret names.
pub const PROD_MODE: &str = "prod";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Infrastructure credential keys withheld from secret payloads.
pub const DENIED_KEYS: &[&str] = &[
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_REGION",
    "AWS_SECRET_NAME",
];

/// Services that receive the credential keys anyway.
pub const PASSTHROUGH_SERVICES: &[&str] = &["patients"];

/// Services synced when the configuration does not name any.
pub const DEFAULT_SERVICES: &[&str] = &[
    "admin",
    "appointment",
    "charting",
    "communication-manager",
    "medication",
    "notification",
    "patients",
    "payments",
    "reports",
    "tasks",
    "therapies",
    "tickets",
];

/// Environment variables read at startup.
pub mod vars {
    pub const MODE: &str = "APP_MODE";
    pub const VERSION: &str = "VERSION";
    pub const REGION: &str = "AWS_REGION";
    pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
    pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
    pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
    pub const ENDPOINT_URL: &str = "SECRETSYNC_ENDPOINT_URL";
    pub const LOG: &str = "SECRETSYNC_LOG";
}
