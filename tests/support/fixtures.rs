//! Test fixtures and constants.

/// Env file with one credential key and one ordinary key.
pub const REGION_AND_FOO: &str = "AWS_REGION=us-east-1\nFOO=bar\n";

/// Env file exercising comments, quoting and `=` inside values.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# database
DATABASE_URL="postgres://app:pw@db:5432/app?sslmode=require"
API_KEY='sk-test-12345'
   PADDED   =   spaced out
EMPTY=

# credentials, withheld unless allow-listed
AWS_ACCESS_KEY_ID=AKIAEXAMPLE
AWS_SECRET_ACCESS_KEY=wJalrXUtnFEMIEXAMPLEKEY
"#;

/// A value that must never show up in output or logs.
pub const CANARY_VALUE: &str = "canary-7f3e9b1d";

/// Static credentials for commands that need them but never reach AWS.
pub const FAKE_ACCESS_KEY_ID: &str = "AKIATESTTESTTEST";
pub const FAKE_SECRET_ACCESS_KEY: &str = "fake-secret-access-key-do-not-log";
