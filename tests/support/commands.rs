//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables the binary reads; cleared so the developer's shell cannot leak
/// into tests.
const SCRUBBED_VARS: &[&str] = &[
    "APP_MODE",
    "VERSION",
    "AWS_REGION",
    "AWS_ACCESS_KEY_ID",
    "AWS_SECRET_ACCESS_KEY",
    "AWS_SESSION_TOKEN",
    "AWS_PROFILE",
    "SECRETSYNC_ENDPOINT_URL",
    "SECRETSYNC_LOG",
];

impl Test {
    /// Create a secretsync command rooted in the project directory.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - NO_COLOR set so output can be matched literally
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("secretsync").expect("failed to find secretsync binary");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run with the given arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run secretsync")
    }

    /// Shortcut for `secretsync name <service>`.
    pub fn name(&self, service: &str) -> Output {
        self.run(&["name", service])
    }

    /// Shortcut for `secretsync check`.
    pub fn check(&self) -> Output {
        self.run(&["check"])
    }

    /// Shortcut for `secretsync check --json`.
    pub fn check_json(&self) -> Output {
        self.run(&["check", "--json"])
    }

    /// Shortcut for `secretsync sync --json`.
    pub fn sync_json(&self) -> Output {
        self.run(&["sync", "--json"])
    }
}
