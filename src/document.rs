//! Section-keyed raw store and the typed entry points over it.
//!
//! # Responsibilities
//! - Hold the loaded document as opaque, format-native section payloads
//! - Serve typed requests by running the loading pipeline per call
//!
//! # Design Decisions
//! - Sections stay un-decoded until a typed request names a shape; the same
//!   payload can be decoded into different shapes by different callers
//! - An absent section is `Ok(None)`, not an error: callers distinguish
//!   "not configured" from "misconfigured"
//! - Every error leaving a typed entry point is wrapped with the section
//!   name

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::format::Format;
use crate::loader;
use crate::secrets::SecretRegistry;
use crate::shape::{ClientFactory, Validate};

/// A loaded configuration document.
///
/// Immutable after construction; every typed request re-runs the pipeline
/// from the stored payload, so returned instances never share state with the
/// document or with each other.
pub struct Document {
    format: Format,
    secrets: Arc<SecretRegistry>,
    sections: BTreeMap<String, String>,
}

impl Document {
    /// Parse a document from text in the given format.
    ///
    /// The top level must be a mapping of section names; each entry is
    /// re-encoded to format-native text and stored as an opaque payload.
    pub fn parse(text: &str, format: Format, secrets: Arc<SecretRegistry>) -> ConfigResult<Self> {
        let tree = format.decode_value(text)?;
        let Value::Object(map) = tree else {
            return Err(ConfigError::Parse {
                format,
                source: "top level of a config document must be a mapping of section names".into(),
            });
        };

        let mut sections = BTreeMap::new();
        for (name, value) in map {
            let raw = format.encode_value(&name, &value)?;
            sections.insert(name, raw);
        }
        tracing::debug!(format = %format, sections = sections.len(), "config document loaded");

        Ok(Self {
            format,
            secrets,
            sections,
        })
    }

    /// Read and parse a document, inferring the format from the file
    /// extension.
    pub fn from_file(path: impl AsRef<Path>, secrets: Arc<SecretRegistry>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format, secrets)
    }

    /// Build a document from pre-rendered section payloads.
    pub fn from_sections(
        sections: BTreeMap<String, String>,
        format: Format,
        secrets: Arc<SecretRegistry>,
    ) -> Self {
        Self {
            format,
            secrets,
            sections,
        }
    }

    /// Format the document's payloads are stored in.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Names of the sections present in the document.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Whether a section is present.
    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// The raw payload of a section, if present.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    /// Decode, expand, and validate a section into a fresh `S`.
    ///
    /// Returns `Ok(None)` when the section is absent. Repeated calls for the
    /// same section produce value-equal but storage-independent instances.
    pub fn get<S>(&self, name: &str) -> ConfigResult<Option<S>>
    where
        S: DeserializeOwned + Validate,
    {
        let Some(raw) = self.sections.get(name) else {
            tracing::debug!(section = %name, "section not present");
            return Ok(None);
        };

        loader::load(raw, self.format, &self.secrets)
            .map(Some)
            .map_err(|err| err.in_section(name))
    }

    /// Load a section and construct its client.
    ///
    /// Absent section → `Ok(None)`; invalid section → validation error;
    /// construction failure → client-construction error. All wrapped with
    /// the section name.
    pub fn get_client<S>(&self, name: &str) -> ConfigResult<Option<S::Client>>
    where
        S: ClientFactory + DeserializeOwned,
    {
        Ok(self
            .get_client_and_config::<S>(name)?
            .map(|(client, _)| client))
    }

    /// Load a section and construct its client, returning both.
    ///
    /// The client and the configuration come from the same pipeline run.
    pub fn get_client_and_config<S>(&self, name: &str) -> ConfigResult<Option<(S::Client, S)>>
    where
        S: ClientFactory + DeserializeOwned,
    {
        let Some(shape) = self.get::<S>(name)? else {
            return Ok(None);
        };

        let client = shape
            .create_client()
            .map_err(|source| ConfigError::ClientConstruction { source }.in_section(name))?;
        Ok(Some((client, shape)))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("format", &self.format)
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .finish()
    }
}
