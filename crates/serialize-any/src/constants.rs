//! Wire-format constants: envelope field names, type-tag field names, and
//! the discriminators used by the type registry.

/// Top-level envelope marker field. Any text accepted by `decode` must parse
/// to an object carrying this field set to `true`.
pub const ENVELOPE_MARKER: &str = "_Serialize_Any_Encoded";

/// Top-level envelope field holding the encoded root.
pub const ENVELOPE_CONTENT: &str = "_SA_Content";

/// Type-tag field embedded in every serialized non-plain value.
pub const TYPE_FIELD: &str = "_SAType";

/// Suffix appended to a discriminator to name its serialized (on-the-wire)
/// paired form, e.g. `Date` -> `Date_Serialized`.
pub const SERIALIZED_SUFFIX: &str = "_Serialized";

// Per-type payload field names.
pub const FIELD_TIMESTAMP: &str = "_SAtimestamp";
pub const FIELD_SOURCE: &str = "_SAsource";
pub const FIELD_FLAGS: &str = "_SAflags";
pub const FIELD_KV_PAIRS: &str = "_SAkvPairs";
pub const FIELD_VALUES: &str = "_SAvalues";
pub const FIELD_NUM: &str = "_SAnum";
pub const FIELD_UTF8_STRING: &str = "_SAutf8String";
pub const FIELD_FUNCTION_STRING: &str = "_SAfunctionString";
pub const FIELD_CONSTRUCTOR_NAME: &str = "_SAconstructorName";
pub const FIELD_OBJECT: &str = "_SAobject";

// Discriminators with no live/serialized pairing convention.
pub const TYPE_PRIMITIVE: &str = "primitive";
pub const TYPE_UNDEF: &str = "undef";
pub const TYPE_OBJECT: &str = "Object";
pub const TYPE_ARRAY: &str = "Array";

// Custom-constructed values use dedicated tags instead of the
// `_Serialized` suffix convention.
pub const TAG_CUSTOM_OBJECT: &str = "_SACustomObject";
pub const TAG_CUSTOM_ARRAY: &str = "_SACustomArray";

/// Default recursion depth budget for both encode and decode.
pub const DEFAULT_MAX_DEPTH: u32 = 20;
