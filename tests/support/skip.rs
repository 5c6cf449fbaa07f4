/// Skip a test if AWS credentials or a test prefix are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err()
            || std::env::var("AWS_SECRET_ACCESS_KEY").is_err()
        {
            eprintln!("SKIPPED: AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY not set");
            return;
        }
        if std::env::var("SECRETSYNC_TEST_PREFIX").is_err() {
            eprintln!("SKIPPED: SECRETSYNC_TEST_PREFIX not set (secrets are created under it)");
            return;
        }
    };
}
