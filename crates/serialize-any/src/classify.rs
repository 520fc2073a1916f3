//! The type classifier: assigns every value a stable type discriminator.
//!
//! Both the encode and decode paths consult this function. Serialized
//! (on-the-wire) forms of non-plain types classify to a *different*, paired
//! discriminator (`<Name>_Serialized`, or the dedicated custom-type tags),
//! which is how the decoder tells "already encoded" apart from "live value".

use crate::constants::{
    SERIALIZED_SUFFIX, TAG_CUSTOM_ARRAY, TAG_CUSTOM_OBJECT, TYPE_ARRAY, TYPE_OBJECT,
    TYPE_PRIMITIVE, TYPE_UNDEF,
};
use crate::registry::Registry;
use crate::value::{CustomPayload, SaValue};

/// Classify a value. Total: never fails, every value gets exactly one
/// discriminator.
///
/// Resolution order, first match wins:
/// 1. primitives -> `"primitive"`
/// 2. undefined -> `"undef"`
/// 3. big integers -> `"BigInt"`
/// 4. objects already tagged as custom forms -> that tag directly
/// 5. objects carrying any other `_SAType` tag -> `<tag>_Serialized`
/// 6. live non-plain values -> their type name (a custom-constructed value
///    uses its constructor name only when that name is registered)
/// 7. fallback: `"Array"` if list-like, else `"Object"`; custom-constructed
///    values with unregistered constructors use their dedicated custom tags
///
/// Classification never consults registration for built-in live types; the
/// encoder rejects a non-plain value whose bundle cannot serialize it.
pub fn classify(value: &SaValue, registry: &Registry) -> String {
    match value {
        SaValue::Null
        | SaValue::Bool(_)
        | SaValue::Integer(_)
        | SaValue::Float(_)
        | SaValue::Str(_) => TYPE_PRIMITIVE.to_string(),
        SaValue::Undefined => TYPE_UNDEF.to_string(),
        SaValue::BigInt(_) => "BigInt".to_string(),
        SaValue::Object(_) => match value.type_tag() {
            Some(tag) if tag == TAG_CUSTOM_OBJECT || tag == TAG_CUSTOM_ARRAY => tag.to_string(),
            Some(tag) => format!("{tag}{SERIALIZED_SUFFIX}"),
            None => TYPE_OBJECT.to_string(),
        },
        SaValue::Array(_) => TYPE_ARRAY.to_string(),
        SaValue::Date { .. } => "Date".to_string(),
        SaValue::RegExp { .. } => "RegExp".to_string(),
        SaValue::Map(_) => "Map".to_string(),
        SaValue::Set(_) => "Set".to_string(),
        SaValue::Bytes(_) => "Buffer".to_string(),
        SaValue::TypedArray(ta) => ta.kind_name().to_string(),
        SaValue::Function { .. } => "Function".to_string(),
        SaValue::Weak(kind) => kind.name().to_string(),
        SaValue::Custom(custom) => {
            if registry.contains(&custom.constructor) {
                custom.constructor.clone()
            } else {
                match custom.payload {
                    CustomPayload::Object(_) => TAG_CUSTOM_OBJECT.to_string(),
                    CustomPayload::Array(_) => TAG_CUSTOM_ARRAY.to_string(),
                }
            }
        }
    }
}
