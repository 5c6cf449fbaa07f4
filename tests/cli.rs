//! CLI integration tests.
//!
//! Everything here runs without contacting AWS: `name`, `check` and
//! `completions` never build a store client, and `sync` is only driven far
//! enough to hit configuration errors or an unreachable endpoint.

mod support;
use support::*;

use predicates::prelude::*;

#[test]
fn test_name_prod_has_no_suffix() {
    let t = Test::with_dotenv("prod", "v1");

    let output = t.name("admin");

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "admin-v1");
}

#[test]
fn test_name_non_prod_appends_mode() {
    let t = Test::with_dotenv("staging", "v2");

    let output = t.name("communication-manager");

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "communication-manager-v2-staging");
}

#[test]
fn test_name_needs_no_credentials() {
    let t = Test::new();

    let output = t.run(&["name", "tasks", "--mode", "dev", "--app-version", "v9"]);

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "tasks-v9-dev");
}

#[test]
fn test_flags_override_dotenv_and_config() {
    let t = Test::with_dotenv("dev", "v1");
    t.write_config("mode = \"qa\"\nversion = \"v0\"\n");

    let output = t.run(&["name", "admin", "--app-version", "v5"]);

    assert_success(&output);
    // mode from .env beats the file, version from the flag beats both
    assert_eq!(stdout(&output).trim(), "admin-v5-dev");
}

#[test]
fn test_process_env_beats_dotenv() {
    let t = Test::with_dotenv("dev", "v1");

    let output = t
        .cmd()
        .env("VERSION", "v7")
        .args(["name", "admin"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "admin-v7-dev");
}

#[test]
fn test_config_file_flag() {
    let t = Test::new();
    let path = t.dir.path().join("custom.toml");
    std::fs::write(&path, "mode = \"prod\"\nversion = \"v3\"\n").unwrap();

    let output = t.run(&["--config", path.to_str().unwrap(), "name", "reports"]);

    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "reports-v3");
}

#[test]
fn test_missing_version_is_fatal_with_hint() {
    let t = Test::new();
    t.write_dotenv("APP_MODE=prod\n");

    let output = t.name("admin");

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "VERSION");
    assert_stderr_contains(&output, "→");
}

#[test]
fn test_dotenv_in_parent_directory_is_ignored() {
    let t = Test::with_dotenv("prod", "v1");
    let nested = t.dir.path().join("nested");
    std::fs::create_dir_all(&nested).unwrap();

    let output = t
        .cmd()
        .current_dir(&nested)
        .args(["name", "admin"])
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "APP_MODE");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_invalid_mode_is_fatal() {
    let t = Test::with_dotenv("Staging", "v1");

    t.cmd()
        .args(["name", "admin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid mode"));
}

#[test]
fn test_invalid_service_name_is_fatal() {
    let t = Test::with_dotenv("prod", "v1");

    let output = t.name("../etc");

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "not a valid service name");
}

#[test]
fn test_unknown_config_key_is_fatal() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_config("servics = [\"admin\"]\n");

    let output = t.check();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "failed to parse config file");
}

#[test]
fn test_usage_error_exits_one() {
    let t = Test::new();

    let output = t.run(&["frobnicate"]);

    assert_exit_code(&output, 1);
}

#[test]
fn test_help_exits_zero() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("Exit codes"));
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("secretsync"));
}

#[test]
fn test_check_lists_key_names_only() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_service_env(
        "admin",
        ".env",
        &format!("FOO={}\nAWS_REGION=us-east-1\n", CANARY_VALUE),
    );

    let output = t.run(&["check", "-s", "admin"]);

    assert_success(&output);
    assert_stdout_contains(&output, "admin-v1");
    assert_stdout_contains(&output, "FOO");
    assert_output_excludes(&output, "AWS_REGION");
    assert_output_excludes(&output, CANARY_VALUE);
}

#[test]
fn test_check_reports_missing_without_failing() {
    let t = Test::with_dotenv("dev", "v1");

    let output = t.run(&["check", "-s", "admin", "-s", "tasks"]);

    assert_success(&output);
    assert_stdout_contains(&output, "envs/admin/.dev.env not found");
    assert_stdout_contains(&output, "envs/tasks/.dev.env not found");
}

#[test]
fn test_check_malformed_file_exits_two() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_service_env("admin", ".env", "FOO=bar\nFOO_BAR\n");
    t.write_service_env("tasks", ".env", "A=1\n");

    let output = t.run(&["check", "-s", "admin", "-s", "tasks"]);

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "malformed line 2");
    // the later service is still checked
    assert_stdout_contains(&output, "tasks-v1");
}

#[test]
fn test_check_json_shape() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_service_env("patients", ".env", REGION_AND_FOO);
    t.write_service_env("admin", ".env", REGION_AND_FOO);

    let output = t.run(&["check", "--json", "-s", "admin", "-s", "patients", "-s", "tasks"]);

    assert_success(&output);
    let json = stdout_json(&output);
    let reports = json.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["service"], "admin");
    assert_eq!(reports[0]["status"], "ok");
    assert_eq!(reports[0]["keys"], serde_json::json!(["FOO"]));
    assert_eq!(reports[1]["keys"], serde_json::json!(["AWS_REGION", "FOO"]));
    assert_eq!(reports[2]["status"], "missing");
    assert_eq!(reports[2]["secret_id"], "tasks-v1");
}

#[test]
fn test_check_uses_configured_services_and_policy() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_config(
        r#"
services = ["billing"]
envs_dir = "config"

[policy]
denied = ["INTERNAL_TOKEN"]
passthrough = []
"#,
    );
    let dir = t.dir.path().join("config/billing");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "INTERNAL_TOKEN=x\nAWS_REGION=eu-west-1\n").unwrap();

    let output = t.check_json();

    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(json[0]["service"], "billing");
    assert_eq!(json[0]["keys"], serde_json::json!(["AWS_REGION"]));
}

#[test]
fn test_sync_without_credentials_is_fatal() {
    let t = Test::with_dotenv("prod", "v1");
    t.write_service_env("admin", ".env", REGION_AND_FOO);

    let output = t.sync_json();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "AWS_ACCESS_KEY_ID");
    assert!(stdout(&output).is_empty());
}

#[cfg(feature = "aws")]
#[test]
fn test_sync_unreachable_store_exits_two_and_keeps_going() {
    let t = Test::new();
    t.write_dotenv(&format!(
        "APP_MODE=prod\nVERSION=v1\nAWS_ACCESS_KEY_ID={}\nAWS_SECRET_ACCESS_KEY={}\nSECRETSYNC_ENDPOINT_URL=http://127.0.0.1:1\n",
        FAKE_ACCESS_KEY_ID, FAKE_SECRET_ACCESS_KEY
    ));
    t.write_config(
        r#"
services = ["admin", "tasks"]
timeout_secs = 5

[retry]
max_attempts = 1
"#,
    );
    t.write_service_env("admin", ".env", &format!("FOO={}\n", CANARY_VALUE));

    let output = t.sync_json();

    assert_exit_code(&output, 2);
    let json = stdout_json(&output);
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["counts"]["failed"], 1);
    assert_eq!(json["counts"]["skipped"], 1);
    assert_eq!(json["services"][0]["status"], "failed");
    assert_eq!(json["services"][0]["secret_id"], "admin-v1");
    assert_eq!(json["services"][1]["status"], "skipped");
    assert_output_excludes(&output, CANARY_VALUE);
    assert_output_excludes(&output, FAKE_SECRET_ACCESS_KEY);
}
