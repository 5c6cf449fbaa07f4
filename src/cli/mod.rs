//! Command-line interface.

pub mod check;
pub mod completions;
pub mod name;
pub mod output;
pub mod sync;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::core::config::{FileConfig, Overrides, Settings};
use crate::core::domain::Mode;
use crate::core::reconcile::Strategy;
use crate::error::{ConfigError, Result};

/// secretsync - push per-service .env files into AWS Secrets Manager.
#[derive(Parser)]
#[command(
    name = "secretsync",
    about = "Push per-service .env files into AWS Secrets Manager",
    version,
    after_help = "Exit codes: 0 ok, 1 fatal error, 2 one or more services failed"
)]
pub struct Cli {
    /// Enable debug logging (SECRETSYNC_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Config file (default: ./secretsync.toml if present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that override the config file and environment.
#[derive(Args, Debug, Default, Clone)]
pub struct OverrideArgs {
    /// Deployment mode: prod, or a label such as dev or staging
    #[arg(long, global = true)]
    pub mode: Option<String>,

    /// Release version embedded in secret names
    #[arg(long = "app-version", value_name = "VERSION", global = true)]
    pub app_version: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Service to sync (repeatable; replaces the configured list)
    #[arg(short, long = "service", value_name = "NAME", global = true)]
    pub services: Vec<String>,

    /// Directory holding one subdirectory per service
    #[arg(long, value_name = "DIR", global = true)]
    pub envs_dir: Option<PathBuf>,

    /// Services to sync concurrently
    #[arg(short, long, global = true)]
    pub jobs: Option<usize>,

    /// Create/update strategy: probe or create-first
    #[arg(long, global = true)]
    pub strategy: Option<String>,
}

impl OverrideArgs {
    /// Validate the raw flags into config overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unusable mode or strategy.
    pub fn to_overrides(&self) -> Result<Overrides> {
        Ok(Overrides {
            mode: self.mode.as_deref().map(str::parse::<Mode>).transpose()?,
            version: self.app_version.clone(),
            region: self.region.clone(),
            services: self.services.clone(),
            envs_dir: self.envs_dir.clone(),
            jobs: self.jobs,
            strategy: self
                .strategy
                .as_deref()
                .map(str::parse::<Strategy>)
                .transpose()?,
        })
    }
}

/// Log output format.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create or update the secret for every configured service
    Sync {
        /// Probe the store but never create or update
        #[arg(long)]
        dry_run: bool,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and filter every env file without contacting the store
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the secret name for a service
    Name {
        /// Service name
        service: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
///
/// Returns `Ok(false)` when the command ran but at least one service
/// failed.
///
/// # Errors
///
/// Returns error for anything that stops the run as a whole, such as
/// invalid configuration or missing credentials.
pub fn execute(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Completions { shell } => {
            completions::execute(shell)?;
            Ok(true)
        }
        Command::Name { service } => {
            let settings = load_settings(cli.config.as_deref(), &cli.overrides)?;
            name::execute(&settings, &service)?;
            Ok(true)
        }
        Command::Check { json } => {
            let settings = load_settings(cli.config.as_deref(), &cli.overrides)?;
            check::execute(&settings, json)
        }
        Command::Sync { dry_run, json } => {
            let settings = load_settings(cli.config.as_deref(), &cli.overrides)?;
            sync::execute(&settings, dry_run, json)
        }
    }
}

/// Build settings from `.env`, the config file, environment variables and
/// command-line flags.
///
/// # Errors
///
/// Returns error if `.env` or the config file is malformed, or if the
/// merged settings are invalid.
pub fn load_settings(config: Option<&Path>, args: &OverrideArgs) -> Result<Settings> {
    let dotenv = std::env::current_dir()?.join(".env");
    match dotenvy::from_path(&dotenv) {
        Ok(()) => debug!(path = %dotenv.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => {
            return Err(ConfigError::InvalidValue {
                field: ".env",
                reason: e.to_string(),
            }
            .into())
        }
    }

    let file = match config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::discover(&std::env::current_dir()?)?,
    };

    Settings::resolve(file, |name| std::env::var(name).ok(), args.to_overrides()?)
}
