//! Format adapter between raw section payloads and decoded values.
//!
//! # Responsibilities
//! - Name the closed set of supported document formats
//! - Decode a payload into the generic value tree (and back, losslessly)
//! - Decode a payload into a caller-supplied typed shape
//!
//! # Design Decisions
//! - `serde_json::Value` is the interchange tree for every format; the
//!   closed set of value kinds (string, object, array, scalar, null) is what
//!   the interpolation engine dispatches on
//! - Typed decoding happens from re-encoded text, so text-based formats get
//!   scalar coercion from their own deserializer instead of ad-hoc casts
//! - The markup-tag adapter maps elements to objects, repeated sibling tags
//!   to arrays, and element text to strings; attributes are not part of the
//!   mapping

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BoxError, ConfigError, ConfigResult};

mod xml;

/// A supported configuration document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Block-structured markup (`.yaml`/`.yml`). The default.
    #[default]
    Yaml,
    /// Compact object notation (`.json`).
    Json,
    /// Line-oriented key/value (`.toml`).
    Toml,
    /// Markup tags (`.xml`).
    Xml,
}

impl Format {
    /// Parse a format name.
    ///
    /// Unknown names produce [`ConfigError::UnsupportedFormat`] so a
    /// misconfigured format setting surfaces immediately.
    pub fn from_name(name: &str) -> ConfigResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            "xml" => Ok(Format::Xml),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_name(ext)
    }

    /// Decode a payload into the generic value tree.
    ///
    /// For the markup-tag format the root element is a wrapper; its content
    /// is returned.
    pub fn decode_value(&self, text: &str) -> ConfigResult<Value> {
        match self {
            Format::Yaml => serde_yaml::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Json => serde_json::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Toml => toml::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Xml => xml::decode(text).map_err(|e| ConfigError::Parse {
                format: *self,
                source: e,
            }),
        }
    }

    /// Re-encode a value tree as format-native text.
    ///
    /// `root` names the wrapping element for the markup-tag format and is
    /// ignored by the others.
    pub fn encode_value(&self, root: &str, value: &Value) -> ConfigResult<String> {
        match self {
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| self.encode_err(e)),
            Format::Json => serde_json::to_string_pretty(value).map_err(|e| self.encode_err(e)),
            Format::Toml => toml::to_string(value).map_err(|e| self.encode_err(e)),
            Format::Xml => xml::encode(root, value).map_err(|e| ConfigError::Encode {
                format: *self,
                source: e,
            }),
        }
    }

    /// Decode a payload into a typed shape.
    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> ConfigResult<T> {
        match self {
            Format::Yaml => serde_yaml::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Json => serde_json::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Toml => toml::from_str(text).map_err(|e| self.parse_err(e)),
            Format::Xml => quick_xml::de::from_str(text).map_err(|e| self.parse_err(e)),
        }
    }

    fn parse_err<E>(&self, source: E) -> ConfigError
    where
        E: Into<BoxError>,
    {
        ConfigError::Parse {
            format: *self,
            source: source.into(),
        }
    }

    fn encode_err<E>(&self, source: E) -> ConfigError
    where
        E: Into<BoxError>,
    {
        ConfigError::Encode {
            format: *self,
            source: source.into(),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Xml => "xml",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_from_name() {
        assert_eq!(Format::from_name("yaml").unwrap(), Format::Yaml);
        assert_eq!(Format::from_name("YML").unwrap(), Format::Yaml);
        assert_eq!(Format::from_name("json").unwrap(), Format::Json);

        let err = Format::from_name("ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(name) if name == "ini"));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            Format::from_path(Path::new("app/config.toml")).unwrap(),
            Format::Toml
        );
        assert!(Format::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_value_round_trip_yaml_json_toml() {
        let tree = json!({
            "address": "localhost:6379",
            "max_idle": 8,
            "replicas": ["a", "b"],
            "pool": { "size": 4 }
        });

        for format in [Format::Yaml, Format::Json, Format::Toml] {
            let text = format.encode_value("config", &tree).unwrap();
            let back = format.decode_value(&text).unwrap();
            assert_eq!(back, tree, "round trip through {format}");
        }
    }

    #[test]
    fn test_xml_value_round_trip_keeps_structure() {
        let tree = json!({
            "server": {
                "address": "0.0.0.0:8080",
                "hosts": ["a.example", "b.example"]
            }
        });

        let text = Format::Xml.encode_value("config", &tree).unwrap();
        let back = Format::Xml.decode_value(&text).unwrap();

        // Markup-tag scalars come back as text until typed decoding.
        assert_eq!(back["server"]["address"], json!("0.0.0.0:8080"));
        assert_eq!(back["server"]["hosts"], json!(["a.example", "b.example"]));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Server {
        address: String,
        port: u16,
    }

    #[test]
    fn test_xml_typed_decode_coerces_scalars() {
        let tree = json!({ "address": "0.0.0.0", "port": "8080" });
        let text = Format::Xml.encode_value("server", &tree).unwrap();

        let server: Server = Format::Xml.decode(&text).unwrap();
        assert_eq!(
            server,
            Server {
                address: "0.0.0.0".to_string(),
                port: 8080,
            }
        );
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let err = Format::Toml.decode_value("this is not valid toml {[}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: Format::Toml, .. }));
    }
}
