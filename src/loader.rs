//! Typed loading pipeline.
//!
//! # Data Flow
//! ```text
//! raw section text
//!     → Format::decode_value (generic tree; Parse error on bad syntax)
//!     → expand_value (placeholder substitution, total or error)
//!     → Format::encode_value + Format::decode::<S> (fresh typed instance)
//!     → S::validate (business rules)
//!     → returned instance, owned exclusively by the caller
//! ```
//!
//! # Design Decisions
//! - Every call runs the full pipeline; nothing decoded is cached or shared,
//!   so instances from separate calls can never alias
//! - The typed instance is decoded from re-encoded text rather than from the
//!   tree, so text-based formats get scalar coercion from their own
//!   deserializer

use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};
use crate::expand::expand_value;
use crate::format::Format;
use crate::secrets::SecretRegistry;
use crate::shape::Validate;

/// Root tag used when re-encoding an expanded tree in a markup-tag format.
const RENDER_ROOT: &str = "config";

/// Decode, expand, and validate an in-memory payload into a fresh `S`.
///
/// This is the same pipeline [`Document::get`](crate::Document::get) runs
/// per section; it is public for controller-specific sub-configuration
/// blocks that arrive as raw payloads inside an outer structure.
pub fn load<S>(text: &str, format: Format, secrets: &SecretRegistry) -> ConfigResult<S>
where
    S: DeserializeOwned + Validate,
{
    let tree = format.decode_value(text)?;
    let expanded = expand_value(tree, secrets)?;
    let rendered = format.encode_value(RENDER_ROOT, &expanded)?;

    let shape: S = format.decode(&rendered)?;
    shape
        .validate()
        .map_err(|source| ConfigError::Validation { source })?;
    Ok(shape)
}
