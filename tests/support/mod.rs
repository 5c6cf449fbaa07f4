//! Test support utilities for secretsync integration tests.
//!
//! Provides an isolated project directory plus helpers to lay out env files
//! and run the binary against it.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Child processes run with `.current_dir()` set to `dir`, so tests never
/// touch the process working directory and can run in parallel.
pub struct Test {
    /// Project directory (holds `.env`, `secretsync.toml` and `envs/`)
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an empty project.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Project with a `.env` naming mode and version.
    pub fn with_dotenv(mode: &str, version: &str) -> Self {
        let t = Self::new();
        t.write_dotenv(&format!("APP_MODE={}\nVERSION={}\n", mode, version));
        t
    }

    /// Write the project's `.env`.
    pub fn write_dotenv(&self, contents: &str) {
        fs::write(self.dir.path().join(".env"), contents).expect("failed to write .env");
    }

    /// Write `secretsync.toml`.
    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("secretsync.toml"), contents)
            .expect("failed to write secretsync.toml");
    }

    /// Write a service env file under `envs/`. `file` is `.env` for prod or
    /// `.{mode}.env` otherwise.
    pub fn write_service_env(&self, service: &str, file: &str, contents: &str) -> PathBuf {
        let dir = self.dir.path().join("envs").join(service);
        fs::create_dir_all(&dir).expect("failed to create service dir");
        let path = dir.join(file);
        fs::write(&path, contents).expect("failed to write service env file");
        path
    }

    /// Path to the `envs/` directory.
    pub fn envs_dir(&self) -> PathBuf {
        self.dir.path().join("envs")
    }
}
