//! AWS Secrets Manager provider (feature `aws`).
//!
//! The SDK is async; the provider owns a current-thread runtime and drives
//! each call to completion to satisfy the synchronous provider contract.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client;
use serde_json::Value;
use tokio::runtime::{Builder, Runtime};

use super::{SecretError, SecretProvider};

/// Resolves keys as fields of one Secrets Manager secret.
///
/// The named secret is expected to hold a JSON object; `resolve(key)`
/// extracts the field. Credentials come from the default provider chain
/// (environment, profile, instance metadata).
pub struct AwsSecretsProvider {
    client: Client,
    secret_id: String,
    runtime: Runtime,
}

impl AwsSecretsProvider {
    /// Create a provider for the named secret in `region`.
    pub fn new(
        region: impl Into<String>,
        secret_id: impl Into<String>,
    ) -> Result<Self, SecretError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SecretError::Backend(Box::new(e)))?;

        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.into()))
                .load(),
        );

        Ok(Self {
            client: Client::new(&config),
            secret_id: secret_id.into(),
            runtime,
        })
    }
}

impl SecretProvider for AwsSecretsProvider {
    fn resolve(&self, key: &str) -> Result<String, SecretError> {
        tracing::debug!(secret_id = %self.secret_id, key = %key, "secrets manager lookup");

        let output = self
            .runtime
            .block_on(
                self.client
                    .get_secret_value()
                    .secret_id(&self.secret_id)
                    .send(),
            )
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    SecretError::NotFound(format!("secret '{}' does not exist", self.secret_id))
                } else {
                    SecretError::Backend(Box::new(err))
                }
            })?;

        let raw = output.secret_string().ok_or_else(|| {
            SecretError::NotFound(format!("secret '{}' has no string payload", self.secret_id))
        })?;

        let payload: Value =
            serde_json::from_str(raw).map_err(|e| SecretError::Backend(Box::new(e)))?;
        let field = payload.get(key).ok_or_else(|| {
            SecretError::NotFound(format!(
                "key '{key}' absent in secret '{}'",
                self.secret_id
            ))
        })?;

        Ok(match field {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
