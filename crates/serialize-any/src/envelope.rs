//! The envelope protocol: wraps the encoded root in a marker structure and
//! performs the final text (de)serialization via `serde_json`.
//!
//! Any text accepted by [`decode`] must parse to an object carrying the
//! `_Serialize_Any_Encoded` marker set to `true`; absence is a format
//! error, never a silent fallback.

use crate::classify::classify;
use crate::constants::{DEFAULT_MAX_DEPTH, ENVELOPE_CONTENT, ENVELOPE_MARKER, TYPE_OBJECT};
use crate::decoder::{Resolver, SaDecoder};
use crate::encoder::SaEncoder;
use crate::error::{DecodeError, EncodeError};
use crate::registry::Registry;
use crate::value::SaValue;

/// Options recognized by [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Maximum nesting level permitted before encoding fails.
    pub max_depth: u32,
    /// Pretty-print the envelope text.
    pub pretty: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }
}

/// Encode a value into envelope text using the process default registry.
pub fn encode(value: &SaValue, options: &EncodeOptions) -> Result<String, EncodeError> {
    encode_with_registry(Registry::global(), value, options)
}

/// Encode a value into envelope text using an explicit registry.
pub fn encode_with_registry(
    registry: &Registry,
    value: &SaValue,
    options: &EncodeOptions,
) -> Result<String, EncodeError> {
    let encoder = SaEncoder::with_options(registry, *options);
    let content = encoder.encode(value)?;
    let envelope = SaValue::Object(vec![
        (ENVELOPE_MARKER.to_string(), SaValue::Bool(true)),
        (ENVELOPE_CONTENT.to_string(), content),
    ]);
    let json = serde_json::Value::from(envelope);
    let text = if options.pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    // Serializing a serde_json::Value to a string cannot fail.
    Ok(text.unwrap_or_default())
}

/// Decode envelope text back into a live value using the process default
/// registry.
pub fn decode(text: &str, resolver: Option<&dyn Resolver>) -> Result<SaValue, DecodeError> {
    decode_with_registry(Registry::global(), text, resolver)
}

/// Decode envelope text back into a live value using an explicit registry.
pub fn decode_with_registry(
    registry: &Registry,
    text: &str,
    resolver: Option<&dyn Resolver>,
) -> Result<SaValue, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|_| DecodeError::Format("invalid JSON text"))?;
    let parsed = SaValue::from(json);
    if classify(&parsed, registry) != TYPE_OBJECT {
        return Err(DecodeError::Format("top-level value is not a plain object"));
    }
    let SaValue::Object(pairs) = parsed else {
        return Err(DecodeError::Format("top-level value is not a plain object"));
    };
    let marker_set = pairs
        .iter()
        .any(|(k, v)| k == ENVELOPE_MARKER && *v == SaValue::Bool(true));
    if !marker_set {
        return Err(DecodeError::Format("envelope marker missing"));
    }
    let content = pairs
        .into_iter()
        .find(|(k, _)| k == ENVELOPE_CONTENT)
        .map(|(_, v)| v)
        .ok_or(DecodeError::Format("envelope content missing"))?;
    SaDecoder::new(registry).decode(&content, resolver)
}
