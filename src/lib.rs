//! Sectioned configuration loading with pluggable secret resolution.
//!
//! # Data Flow
//! ```text
//! config document (YAML/JSON/TOML/XML)
//!     → document.rs (split into opaque section payloads)
//!     → on Document::get::<Shape>(section), per call:
//!         format.rs   (decode payload into the generic value tree)
//!         expand.rs   (substitute ${scheme:key} via the provider registry)
//!         format.rs   (re-encode, decode a fresh typed instance)
//!         shape.rs    (Validate::validate)
//!     → instance owned exclusively by the caller
//!
//! ${scheme:key} resolution:
//!     secrets/ registry → env / file / vault / cloud provider
//! ```
//!
//! # Design Decisions
//! - Sections are decoded on demand, per typed request; nothing decoded is
//!   cached, so instances from separate calls never share storage
//! - The provider registry is an explicitly constructed object shared via
//!   `Arc`, safe for concurrent registration and resolution
//! - Expansion is total: the first unresolved placeholder aborts the load
//!   and no partially-substituted value is ever returned
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use confidant::{Document, Format, SecretRegistry, Validate, ValidationError};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct ServerConfig {
//!     address: String,
//! }
//!
//! impl Validate for ServerConfig {
//!     fn validate(&self) -> Result<(), ValidationError> {
//!         if self.address.is_empty() {
//!             return Err(ValidationError::new("address", "must not be empty"));
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), confidant::ConfigError> {
//! let secrets = Arc::new(SecretRegistry::with_defaults());
//! let doc = Document::parse(
//!     "server:\n  address: \"${env:HOST}:8080\"\n",
//!     Format::Yaml,
//!     secrets,
//! )?;
//!
//! if let Some(server) = doc.get::<ServerConfig>("server")? {
//!     println!("listening on {}", server.address);
//! }
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod expand;
pub mod format;
pub mod loader;
pub mod secrets;
pub mod shape;

pub use document::Document;
pub use error::{BoxError, ConfigError, ConfigResult};
pub use expand::{expand_str, expand_value};
pub use format::Format;
pub use loader::load;
pub use secrets::{
    EnvProvider, FileProvider, KvVersion, ResolveError, SecretError, SecretProvider,
    SecretRegistry, VaultProvider,
};
pub use shape::{ClientFactory, Validate, ValidationError};

#[cfg(feature = "aws")]
pub use secrets::AwsSecretsProvider;
