//! secretsync - push per-service .env files into AWS Secrets Manager.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secretsync::cli::output;
use secretsync::cli::{execute, Cli, LogFormat};
use secretsync::core::constants::vars;
use secretsync::error::{ConfigError, Error};

/// Exit code when at least one service failed.
const EXIT_PARTIAL: i32 = 2;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors are fatal (1); help and version output are not.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose, cli.log_format);

    match execute(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_PARTIAL),
        Err(e) => {
            output::error(&e.to_string());
            if let Some(hint) = suggestion(&e) {
                output::hint(hint);
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_env(vars::LOG).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("secretsync=debug")
        } else {
            EnvFilter::new("secretsync=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn suggestion(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::Missing { var }) if var.starts_with("AWS_") => {
            Some("set AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY in the environment or .env")
        }
        Error::Config(ConfigError::Missing { .. }) => {
            Some("set APP_MODE and VERSION in .env, secretsync.toml, or pass --mode/--app-version")
        }
        Error::Config(ConfigError::NoBackend) => Some("cargo install secretsync --features aws"),
        _ => None,
    }
}
