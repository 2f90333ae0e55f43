//! Placeholder interpolation over the decoded value tree.
//!
//! # Responsibilities
//! - Walk every reachable string in a decoded section, depth first
//! - Substitute `${scheme:key}` and `${key}` placeholders via the registry
//! - Abort the whole expansion on the first unresolved placeholder
//!
//! # Design Decisions
//! - Dispatch happens over the closed kind set of the generic value tree
//!   (string, object, array, scalar, null) instead of per-shape reflection
//! - The walk takes the tree by value and rebuilds containers entry by
//!   entry, so an expanded result can never alias engine-held storage
//! - A resolution failure propagates as an error value; a partially
//!   substituted tree is never observable

use serde_json::{Map, Value};

use crate::secrets::{ResolveError, SecretRegistry};

/// Expand every placeholder reachable from `value`.
///
/// String fields are trimmed before matching so trailing document artifacts
/// (a newline from a file-based format, padding from a tag body) do not
/// defeat placeholder detection.
pub fn expand_value(value: Value, secrets: &SecretRegistry) -> Result<Value, ResolveError> {
    match value {
        Value::String(s) => expand_str(&s, secrets).map(Value::String),
        Value::Array(items) => items
            .into_iter()
            .map(|item| expand_value(item, secrets))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            // Rebuild entry by entry: each value is expanded as its own copy
            // and written back under the same key.
            let mut out = Map::with_capacity(map.len());
            for (key, entry) in map {
                out.insert(key, expand_value(entry, secrets)?);
            }
            Ok(Value::Object(out))
        }
        // numbers, booleans, null carry no placeholders
        other => Ok(other),
    }
}

/// Expand placeholders in a single string.
///
/// `${scheme:key}` selects a provider explicitly; `${key}` resolves under
/// the registry's default scheme. `${}` is resolved (not skipped) and fails
/// as not-found. An unterminated `${` is kept as literal text.
pub fn expand_str(input: &str, secrets: &SecretRegistry) -> Result<String, ResolveError> {
    let trimmed = input.trim();
    if !trimmed.contains("${") {
        return Ok(trimmed.to_string());
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut rest = trimmed;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            // no closing brace: literal remainder
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let body = &after[..end];
        let resolved = match body.split_once(':') {
            Some((scheme, key)) => secrets.resolve(scheme, key)?,
            None => secrets.resolve_default(body)?,
        };
        out.push_str(&resolved);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
