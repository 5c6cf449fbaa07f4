//! AWS Secrets Manager store.
//!
//! Enable with `--features aws` (on by default).
//!
//! The client is built from the static credentials and region in
//! [`Settings`]; the default AWS credential chain is not consulted. SDK-level
//! retries are disabled so that [`super::Retrying`] is the only retry policy
//! in play.
//!
//! The SDK is async; calls are driven to completion on a private tokio
//! runtime so the rest of the crate stays synchronous.

use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::Client;
use tracing::{debug, info, trace};

use super::{SecretStore, StoreResult};
use crate::core::config::Settings;
use crate::core::domain::SecretId;
use crate::error::{Result, StoreError, StoreOp};

/// Provider name attached to the static credentials.
const PROVIDER_NAME: &str = "secretsync";

/// AWS Secrets Manager backend.
pub struct AwsSecretsManager {
    client: Client,
    runtime: tokio::runtime::Runtime,
    region: String,
}

impl std::fmt::Debug for AwsSecretsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretsManager")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretsManager {
    /// Build a client for the configured region.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no credentials are configured, or an
    /// I/O error if the runtime cannot be started.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let credentials = settings.credentials()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(settings.jobs().clamp(1, 8))
            .thread_name("secretsync-aws")
            .enable_all()
            .build()?;

        let provider = aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.to_string(),
            credentials.session_token.as_ref().map(|t| t.to_string()),
            None,
            PROVIDER_NAME,
        );

        let mut timeouts = TimeoutConfig::builder();
        if let Some(timeout) = settings.timeout() {
            timeouts = timeouts.operation_timeout(timeout);
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region().to_string()))
            .credentials_provider(provider)
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeouts.build());
        if let Some(url) = settings.endpoint_url() {
            debug!(endpoint_url = url, "using custom endpoint");
            loader = loader.endpoint_url(url);
        }

        let sdk_config = runtime.block_on(loader.load());
        let client = Client::new(&sdk_config);

        info!(region = settings.region(), "connected to AWS Secrets Manager");

        Ok(Self {
            client,
            runtime,
            region: settings.region().to_string(),
        })
    }
}

impl SecretStore for AwsSecretsManager {
    fn name(&self) -> &'static str {
        "aws-secretsmanager"
    }

    fn exists(&self, id: &SecretId) -> StoreResult<bool> {
        trace!(secret_id = %id, region = %self.region, "GetSecretValue");

        let result = self.runtime.block_on(
            self.client
                .get_secret_value()
                .secret_id(id.as_str())
                .send(),
        );

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let SdkError::ServiceError(ref service_err) = e {
                    if service_err.err().is_resource_not_found_exception() {
                        return Ok(false);
                    }
                }
                Err(classify(StoreOp::Exists, id, e))
            }
        }
    }

    fn create(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        trace!(secret_id = %id, region = %self.region, "CreateSecret");

        let result = self.runtime.block_on(
            self.client
                .create_secret()
                .name(id.as_str())
                .secret_string(value)
                .send(),
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(ref service_err) = e {
                    if service_err.err().is_resource_exists_exception() {
                        return Err(StoreError::AlreadyExists { id: id.to_string() });
                    }
                }
                Err(classify(StoreOp::Create, id, e))
            }
        }
    }

    fn update(&self, id: &SecretId, value: &str) -> StoreResult<()> {
        trace!(secret_id = %id, region = %self.region, "UpdateSecret");

        let result = self.runtime.block_on(
            self.client
                .update_secret()
                .secret_id(id.as_str())
                .secret_string(value)
                .send(),
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(ref service_err) = e {
                    if service_err.err().is_resource_not_found_exception() {
                        return Err(StoreError::NotFound { id: id.to_string() });
                    }
                }
                Err(classify(StoreOp::Update, id, e))
            }
        }
    }
}

/// Map an SDK failure onto the store error taxonomy.
fn classify<E, R>(op: StoreOp, id: &SecretId, err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let id = id.to_string();
    let message = DisplayErrorContext(&err).to_string();

    match &err {
        SdkError::TimeoutError(_) => StoreError::Timeout { op, id, message },
        SdkError::DispatchFailure(failure) if failure.is_timeout() => {
            StoreError::Timeout { op, id, message }
        }
        SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            StoreError::Network { op, id, message }
        }
        SdkError::ServiceError(service_err) => match service_code_class(service_err.err().code()) {
            CodeClass::Throttled => StoreError::Throttled { op, id, message },
            CodeClass::Auth => StoreError::Auth { op, id, message },
            CodeClass::Unavailable => StoreError::Network { op, id, message },
            CodeClass::Other => StoreError::Failure { op, id, message },
        },
        _ => StoreError::Failure { op, id, message },
    }
}

#[derive(Debug, PartialEq, Eq)]
enum CodeClass {
    Throttled,
    Auth,
    Unavailable,
    Other,
}

fn service_code_class(code: Option<&str>) -> CodeClass {
    match code {
        Some(
            "ThrottlingException" | "Throttling" | "TooManyRequestsException"
            | "RequestLimitExceeded",
        ) => CodeClass::Throttled,
        Some(
            "AccessDeniedException" | "UnrecognizedClientException" | "InvalidSignatureException"
            | "ExpiredTokenException" | "IncompleteSignature" | "MissingAuthenticationToken",
        ) => CodeClass::Auth,
        Some("InternalServiceError" | "InternalFailure" | "ServiceUnavailable") => {
            CodeClass::Unavailable
        }
        _ => CodeClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_codes() {
        assert_eq!(service_code_class(Some("ThrottlingException")), CodeClass::Throttled);
        assert_eq!(service_code_class(Some("RequestLimitExceeded")), CodeClass::Throttled);
    }

    #[test]
    fn test_auth_codes() {
        assert_eq!(service_code_class(Some("AccessDeniedException")), CodeClass::Auth);
        assert_eq!(service_code_class(Some("ExpiredTokenException")), CodeClass::Auth);
    }

    #[test]
    fn test_unknown_codes_are_permanent() {
        assert_eq!(service_code_class(Some("InvalidRequestException")), CodeClass::Other);
        assert_eq!(service_code_class(Some("LimitExceededException")), CodeClass::Other);
        assert_eq!(service_code_class(None), CodeClass::Other);
    }

    #[test]
    fn test_connect_without_credentials_fails() {
        let settings = Settings::new(crate::core::domain::Mode::Prod, "v1").unwrap();

        let err = AwsSecretsManager::connect(&settings).unwrap_err();

        assert_eq!(err.kind(), "config");
    }
}
