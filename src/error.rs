//! Engine-wide error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;
use crate::secrets::ResolveError;
use crate::shape::ValidationError;

/// Boxed error type used at the boundaries where arbitrary backend or
/// client-library errors cross into the engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while loading, expanding, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload does not conform to the declared format.
    #[error("{format} parse error: {source}")]
    Parse {
        /// Format the payload was declared to be in.
        format: Format,
        #[source]
        source: BoxError,
    },

    /// A decoded fragment could not be re-encoded in the declared format.
    #[error("{format} encode error: {source}")]
    Encode {
        /// Format the fragment was being rendered in.
        format: Format,
        #[source]
        source: BoxError,
    },

    /// The named format has no adapter.
    #[error("unsupported config format '{0}'")]
    UnsupportedFormat(String),

    /// Placeholder expansion failed.
    #[error(transparent)]
    Secret(#[from] ResolveError),

    /// The decoded and expanded instance failed its own validation.
    #[error("validation failed: {source}")]
    Validation {
        #[source]
        source: ValidationError,
    },

    /// `create_client` failed after successful validation.
    #[error("client construction failed: {source}")]
    ClientConstruction {
        #[source]
        source: BoxError,
    },

    /// Context wrapper naming the section an error originated in.
    #[error("config section '{name}': {source}")]
    Section {
        /// Section the failing pipeline was loading.
        name: String,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wrap an error with the section it originated in.
    pub(crate) fn in_section(self, name: &str) -> Self {
        ConfigError::Section {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type for engine operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
