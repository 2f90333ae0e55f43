//! Shared configuration shapes for integration tests.

use std::collections::HashMap;

use confidant::{BoxError, ClientFactory, Validate, ValidationError};
use serde::Deserialize;

/// Listener-style section with collection fields, for independence checks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub address: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.address.is_empty() {
            return Err(ValidationError::new("address", "must not be empty"));
        }
        Ok(())
    }
}

/// Cache-style section with an optional tuning knob.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RedisConfig {
    pub address: String,
    #[serde(default)]
    pub max_idle: u32,
}

impl Validate for RedisConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.address.is_empty() {
            return Err(ValidationError::new("address", "must not be empty"));
        }
        Ok(())
    }
}

/// Stand-in connection object produced by [`RedisConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RedisClient {
    pub host: String,
    pub port: u16,
}

impl ClientFactory for RedisConfig {
    type Client = RedisClient;

    fn create_client(&self) -> Result<Self::Client, BoxError> {
        let (host, port) = self
            .address
            .split_once(':')
            .ok_or_else(|| format!("malformed address '{}': missing port", self.address))?;
        let port: u16 = port
            .parse()
            .map_err(|_| format!("malformed address '{}': bad port", self.address))?;

        Ok(RedisClient {
            host: host.to_string(),
            port,
        })
    }
}

/// Database-style section with a required connection string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PostgresConfig {
    pub url: String,
}

impl Validate for PostgresConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::new("url", "connection string is required"));
        }
        Ok(())
    }
}
