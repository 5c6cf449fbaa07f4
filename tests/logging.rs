//! Logging and verbosity tests.
//!
//! These tests verify that the verbose flag and SECRETSYNC_LOG control what
//! reaches stderr, and that secret values never do.

mod support;
use support::*;

fn project() -> Test {
    let t = Test::with_dotenv("prod", "v1");
    t.write_service_env(
        "admin",
        ".env",
        &format!("API_KEY={}\nAWS_SECRET_ACCESS_KEY={}\n", CANARY_VALUE, CANARY_VALUE),
    );
    t
}

#[test]
fn test_default_no_log_output() {
    let t = project();

    let output = t.run(&["check", "-s", "admin"]);

    assert_success(&output);
    let err = stderr(&output);
    assert!(
        !err.contains("DEBUG") && !err.contains("TRACE"),
        "default mode should not show debug/trace output: {}",
        err
    );
}

#[test]
fn test_verbose_flag_shows_debug_output() {
    let t = project();

    let output = t.run(&["--verbose", "check", "-s", "admin"]);

    assert_success(&output);
    assert_stderr_contains(&output, "DEBUG");
    assert_stderr_contains(&output, "loading env file");
}

#[test]
fn test_log_env_var_overrides_verbose() {
    let t = project();

    let output = t
        .cmd()
        .env("SECRETSYNC_LOG", "secretsync=error")
        .args(["--verbose", "check", "-s", "admin"])
        .output()
        .unwrap();

    assert_success(&output);
    assert!(!stderr(&output).contains("DEBUG"));
}

#[test]
fn test_json_log_format() {
    let t = project();

    let output = t.run(&["--verbose", "--log-format", "json", "check", "-s", "admin"]);

    assert_success(&output);
    let first = stderr(&output)
        .lines()
        .next()
        .map(str::to_string)
        .expect("expected at least one log line");
    let line: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(line["level"], "DEBUG");
}

#[test]
fn test_trace_logging_never_leaks_values() {
    let t = project();

    let output = t
        .cmd()
        .env("SECRETSYNC_LOG", "trace")
        .args(["check", "-s", "admin", "-s", "patients"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_output_excludes(&output, CANARY_VALUE);
}

#[test]
fn test_logs_stay_off_stdout() {
    let t = project();

    let output = t.run(&["--verbose", "name", "admin"]);

    assert_success(&output);
    assert_eq!(stdout(&output), "admin-v1\n");
}
