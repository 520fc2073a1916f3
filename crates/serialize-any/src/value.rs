//! [`SaValue`]: the universal value type spanning everything the codec can
//! encode and decode.
//!
//! Covers plain JSON shapes (null, bool, numbers, strings, arrays, ordered
//! objects) plus the rich types a plain JSON encoder cannot represent:
//! dates, regular expressions, big integers, binary buffers, maps, sets,
//! fixed-width numeric arrays, functions (source text only), objects and
//! arrays with custom constructors, `undefined`, and weak collections
//! (whose contents are not observable and therefore never serializable).

use crate::constants::TYPE_FIELD;

/// Universal value type for the serialize-any codec.
#[derive(Debug, Clone, PartialEq)]
pub enum SaValue {
    /// JSON null.
    Null,
    /// undefined, special-cased because plain JSON encoding silently
    /// drops it.
    Undefined,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    /// Arbitrary-precision-ish integer (two's complement, 128-bit storage).
    /// Plain JSON encoding rejects these outright.
    BigInt(i128),
    /// Binary buffer.
    Bytes(Vec<u8>),
    Array(Vec<SaValue>),
    /// Object with ordered key-value pairs.
    Object(Vec<(String, SaValue)>),
    /// Point in time as milliseconds since the Unix epoch.
    Date { timestamp_ms: i64 },
    /// Regular expression: source pattern plus flag letters.
    RegExp { source: String, flags: String },
    /// Ordered map with arbitrary keys.
    Map(Vec<(SaValue, SaValue)>),
    /// Ordered set. Elements have no positional key; replacement is
    /// identity-keyed (remove the prior value, then insert).
    Set(Vec<SaValue>),
    /// Fixed-width numeric array.
    TypedArray(TypedArray),
    /// Function. Only the source text is preserved, never behavior.
    Function { source: String },
    /// Value constructed by a custom (non-built-in) constructor.
    Custom(Box<SaCustom>),
    /// Weak collection. Contents are not observable, so serialization
    /// always fails with an unsupported-type error.
    Weak(WeakKind),
}

/// A custom-constructed value: the constructor name plus either an
/// own-property snapshot (object-like) or an element list (array-like).
#[derive(Debug, Clone, PartialEq)]
pub struct SaCustom {
    pub constructor: String,
    pub payload: CustomPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CustomPayload {
    Object(Vec<(String, SaValue)>),
    Array(Vec<SaValue>),
}

/// Fixed-width numeric array kinds. The 64-bit element kinds travel as
/// decimal strings on the wire; everything else as plain JSON numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Uint8Clamped(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    BigInt64(Vec<i64>),
    BigUint64(Vec<u64>),
}

impl TypedArray {
    /// The registry discriminator for this element kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedArray::Int8(_) => "Int8Array",
            TypedArray::Uint8(_) => "Uint8Array",
            TypedArray::Uint8Clamped(_) => "Uint8ClampedArray",
            TypedArray::Int16(_) => "Int16Array",
            TypedArray::Uint16(_) => "Uint16Array",
            TypedArray::Int32(_) => "Int32Array",
            TypedArray::Uint32(_) => "Uint32Array",
            TypedArray::Float32(_) => "Float32Array",
            TypedArray::Float64(_) => "Float64Array",
            TypedArray::BigInt64(_) => "BigInt64Array",
            TypedArray::BigUint64(_) => "BigUint64Array",
        }
    }
}

/// Weak collection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakKind {
    WeakMap,
    WeakSet,
    WeakRef,
}

impl WeakKind {
    pub fn name(&self) -> &'static str {
        match self {
            WeakKind::WeakMap => "WeakMap",
            WeakKind::WeakSet => "WeakSet",
            WeakKind::WeakRef => "WeakRef",
        }
    }
}

impl Default for SaValue {
    fn default() -> Self {
        SaValue::Null
    }
}

impl SaValue {
    /// Look up a field by name on an object value.
    pub fn field(&self, name: &str) -> Option<&SaValue> {
        match self {
            SaValue::Object(pairs) => pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The embedded `_SAType` tag, if this is an object carrying one.
    pub fn type_tag(&self) -> Option<&str> {
        match self.field(TYPE_FIELD) {
            Some(SaValue::Str(tag)) => Some(tag),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SaValue::Integer(i) => Some(*i),
            SaValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SaValue::Integer(i) => Some(*i as f64),
            SaValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// True for shapes plain JSON represents directly.
    pub fn is_plain(&self) -> bool {
        matches!(
            self,
            SaValue::Null
                | SaValue::Bool(_)
                | SaValue::Integer(_)
                | SaValue::Float(_)
                | SaValue::Str(_)
                | SaValue::Array(_)
                | SaValue::Object(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SaValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for SaValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => SaValue::Null,
            serde_json::Value::Bool(b) => SaValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SaValue::Integer(i)
                } else {
                    SaValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => SaValue::Str(s),
            serde_json::Value::Array(arr) => {
                SaValue::Array(arr.into_iter().map(SaValue::from).collect())
            }
            serde_json::Value::Object(obj) => SaValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, SaValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<SaValue> for serde_json::Value {
    fn from(v: SaValue) -> Self {
        match v {
            SaValue::Null => serde_json::Value::Null,
            SaValue::Bool(b) => serde_json::Value::Bool(b),
            SaValue::Integer(i) => serde_json::Value::from(i),
            SaValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            SaValue::Str(s) => serde_json::Value::String(s),
            SaValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            SaValue::Object(pairs) => serde_json::Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            // Non-plain variants reach this point only when their
            // discriminator was left unregistered; they have no JSON
            // projection.
            _ => serde_json::Value::Null,
        }
    }
}
