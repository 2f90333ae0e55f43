//! Vault key/value secret provider.
//!
//! # Responsibilities
//! - Read one secret path over the Vault HTTP API and extract named fields
//! - Support both KV engine layouts: version 1 (fields directly under
//!   `data`) and version 2 (fields nested under `data.data`)
//!
//! # Design Decisions
//! - Blocking HTTP with a construction-time request timeout; the provider
//!   contract is synchronous and a hung backend must not hang forever
//! - HTTP 404 maps to not-found (path absent); any other non-success status
//!   is a backend error so operators can tell outage from misconfiguration

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use super::{SecretError, SecretProvider};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// KV secrets engine version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KvVersion {
    /// Fields live directly under the response `data` object.
    V1,
    /// Fields live one level down, under `data.data`.
    #[default]
    V2,
}

/// Resolves keys as fields of a single Vault secret.
///
/// Configured with the Vault address, an authentication token, the KV mount
/// name, and the secret path under that mount; `resolve(key)` extracts the
/// named field from the secret's payload.
#[derive(Debug)]
pub struct VaultProvider {
    client: Client,
    addr: Url,
    token: String,
    mount: String,
    path: String,
    version: KvVersion,
}

impl VaultProvider {
    /// Create a provider reading `mount/path` on the Vault at `addr`.
    pub fn new(
        addr: &str,
        token: impl Into<String>,
        mount: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, SecretError> {
        let addr = Url::parse(addr).map_err(|e| SecretError::Backend(Box::new(e)))?;
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| SecretError::Backend(Box::new(e)))?;

        Ok(Self {
            client,
            addr,
            token: token.into(),
            mount: mount.into(),
            path: path.into(),
            version: KvVersion::default(),
        })
    }

    /// Select the KV engine version (defaults to [`KvVersion::V2`]).
    pub fn kv_version(mut self, version: KvVersion) -> Self {
        self.version = version;
        self
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, SecretError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SecretError::Backend(Box::new(e)))?;
        Ok(self)
    }

    fn secret_url(&self) -> Result<Url, SecretError> {
        let suffix = match self.version {
            KvVersion::V1 => format!("v1/{}/{}", self.mount, self.path),
            KvVersion::V2 => format!("v1/{}/data/{}", self.mount, self.path),
        };
        self.addr
            .join(&suffix)
            .map_err(|e| SecretError::Backend(Box::new(e)))
    }
}

impl SecretProvider for VaultProvider {
    fn resolve(&self, key: &str) -> Result<String, SecretError> {
        let url = self.secret_url()?;
        tracing::debug!(mount = %self.mount, path = %self.path, key = %key, "vault lookup");

        let response = self
            .client
            .get(url)
            .header("X-Vault-Token", &self.token)
            .send()
            .map_err(|e| SecretError::Backend(Box::new(e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SecretError::NotFound(format!(
                "vault path '{}/{}' does not exist",
                self.mount, self.path
            )));
        }
        if !response.status().is_success() {
            return Err(SecretError::Backend(
                format!("vault returned status {}", response.status()).into(),
            ));
        }

        let body: Value = response
            .json()
            .map_err(|e| SecretError::Backend(Box::new(e)))?;

        let data = match self.version {
            KvVersion::V1 => body.get("data"),
            KvVersion::V2 => body.get("data").and_then(|d| d.get("data")),
        }
        .ok_or_else(|| SecretError::Backend("vault response missing 'data' payload".into()))?;

        let field = data.get(key).ok_or_else(|| {
            SecretError::NotFound(format!(
                "key '{key}' absent at vault path '{}/{}'",
                self.mount, self.path
            ))
        })?;

        Ok(match field {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
