//! serialize-any: JSON-safe envelope encoding for rich in-memory values.
//!
//! Converts values a plain JSON encoder cannot represent (dates, regular
//! expressions, big integers, binary buffers, maps, sets, typed numeric
//! arrays, functions, custom-constructed objects, `undefined`) into a
//! JSON-safe textual envelope, and reconstructs them from that text.
//!
//! The core is a type-dispatch engine: a classifier assigns every value a
//! stable discriminator, a process-wide registry maps discriminators to
//! optional behavior bundles, and a depth-bounded recursive encoder/decoder
//! walks composite values child-first, rewriting them in place. The
//! envelope protocol marks output as belonging to this format and supports
//! caller-supplied resolution of custom types during decode.
//!
//! ```
//! use serialize_any::{decode, encode, EncodeOptions, SaValue};
//!
//! let value = SaValue::Object(vec![
//!     ("when".to_string(), SaValue::Date { timestamp_ms: 1700000000000 }),
//!     ("big".to_string(), SaValue::BigInt(170141183460469231731687303715884105727)),
//! ]);
//! let text = encode(&value, &EncodeOptions::default()).unwrap();
//! let back = decode(&text, None).unwrap();
//! assert_eq!(back, value);
//! ```

mod classify;
mod constants;
mod decoder;
mod encoder;
mod envelope;
mod error;
mod registry;
mod value;

pub use classify::classify;
pub use constants::{DEFAULT_MAX_DEPTH, ENVELOPE_CONTENT, ENVELOPE_MARKER, TYPE_FIELD};
pub use decoder::{DecodeCtx, Resolver, SaDecoder};
pub use encoder::SaEncoder;
pub use envelope::{decode, decode_with_registry, encode, encode_with_registry, EncodeOptions};
pub use error::{DecodeError, EncodeError};
pub use registry::{
    Capabilities, DeserializeFn, ElementInfo, ElementKey, IterateFn, Registry, SerializeFn,
    SetValueFn, TypeEntry,
};
pub use value::{CustomPayload, SaCustom, SaValue, TypedArray, WeakKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_marker_and_content() {
        let text = encode(&SaValue::Integer(42), &EncodeOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["_Serialize_Any_Encoded"], serde_json::json!(true));
        assert_eq!(json["_SA_Content"], serde_json::json!(42));
    }

    #[test]
    fn plain_json_shapes_pass_through() {
        let value = SaValue::Object(vec![
            ("a".to_string(), SaValue::Integer(1)),
            (
                "b".to_string(),
                SaValue::Array(vec![SaValue::Bool(true), SaValue::Null, SaValue::Str("x".into())]),
            ),
        ]);
        let text = encode(&value, &EncodeOptions::default()).unwrap();
        assert_eq!(decode(&text, None).unwrap(), value);
    }

    #[test]
    fn date_round_trips_through_tagged_wire_form() {
        let value = SaValue::Date { timestamp_ms: 1234567890123 };
        let text = encode(&value, &EncodeOptions::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["_SA_Content"]["_SAType"], serde_json::json!("Date"));
        assert_eq!(
            json["_SA_Content"]["_SAtimestamp"],
            serde_json::json!(1234567890123i64)
        );
        assert_eq!(decode(&text, None).unwrap(), value);
    }
}
