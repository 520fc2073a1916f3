//! The type registry: a process-wide table mapping each discriminator to an
//! optional behavior bundle (serialize, deserialize, iterate, set_value).
//!
//! The table is built once from an explicit [`Capabilities`] flag set and is
//! read-only afterward; encode/decode calls only ever look entries up by
//! name. Unknown discriminators resolve to an inert empty bundle, so
//! unrecognized plain-JSON-shaped content passes through untouched.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::classify::classify;
use crate::constants::{
    FIELD_CONSTRUCTOR_NAME, FIELD_FLAGS, FIELD_FUNCTION_STRING, FIELD_KV_PAIRS, FIELD_NUM,
    FIELD_OBJECT, FIELD_SOURCE, FIELD_TIMESTAMP, FIELD_UTF8_STRING, FIELD_VALUES,
    SERIALIZED_SUFFIX, TAG_CUSTOM_ARRAY, TAG_CUSTOM_OBJECT, TYPE_ARRAY, TYPE_FIELD, TYPE_OBJECT,
    TYPE_PRIMITIVE, TYPE_UNDEF,
};
use crate::decoder::DecodeCtx;
use crate::error::{DecodeError, EncodeError};
use crate::value::{CustomPayload, SaValue, TypedArray};

pub type SerializeFn = fn(&SaValue) -> Result<SaValue, EncodeError>;
pub type DeserializeFn = fn(&SaValue, &DecodeCtx<'_>) -> Result<SaValue, DecodeError>;
pub type IterateFn = fn(&SaValue, &Registry) -> Vec<ElementInfo>;
pub type SetValueFn = fn(&mut SaValue, ElementInfo);

/// Position of a child within its container.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKey {
    /// Array index (arrays, custom arrays).
    Index(usize),
    /// Property name (objects, custom objects).
    Property(String),
    /// Key slot of the n-th map entry.
    MapKey(usize),
    /// Value slot of the n-th map entry.
    MapValue(usize),
    /// No positional key; replacement is keyed on the element's prior
    /// value (set-like containers).
    Identity,
}

/// One child of a container, as produced by a bundle's `iterate` and
/// consumed by its `set_value`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementInfo {
    pub key: ElementKey,
    pub value: SaValue,
    /// The child's discriminator at iteration time.
    pub type_name: String,
    /// Prior value for identity-keyed containers, where replacing an
    /// element requires removing the old one first.
    pub original_value: Option<SaValue>,
}

/// Behavior bundle for one discriminator. All operations are optional; an
/// entry with none of them is inert.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeEntry {
    pub serialize: Option<SerializeFn>,
    pub deserialize: Option<DeserializeFn>,
    pub iterate: Option<IterateFn>,
    pub set_value: Option<SetValueFn>,
}

static EMPTY_ENTRY: TypeEntry = TypeEntry {
    serialize: None,
    deserialize: None,
    iterate: None,
    set_value: None,
};

/// Explicit capability flags. Registration for environment-optional types
/// happens only when the corresponding flag is set; the flags are passed in
/// explicitly so the table's contents are deterministic and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub bigint: bool,
    pub typed_arrays: bool,
    /// 64-bit element kinds (BigInt64Array / BigUint64Array).
    pub bigint_typed_arrays: bool,
    pub buffer: bool,
    /// Ordered maps and sets.
    pub collections: bool,
    pub weak_collections: bool,
    pub functions: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            bigint: true,
            typed_arrays: true,
            bigint_typed_arrays: true,
            buffer: true,
            collections: true,
            weak_collections: true,
            functions: true,
        }
    }
}

/// The discriminator -> bundle table, plus the static constructor bindings
/// consulted before the resolver during custom-type decode.
pub struct Registry {
    entries: HashMap<String, TypeEntry>,
    constructors: HashMap<String, Box<dyn Fn() -> SaValue + Send + Sync>>,
}

impl Registry {
    /// Build the table from an explicit capability flag set.
    pub fn new(caps: Capabilities) -> Self {
        let mut r = Registry {
            entries: HashMap::new(),
            constructors: HashMap::new(),
        };

        r.register(TYPE_PRIMITIVE, TypeEntry::default());
        r.register(
            TYPE_OBJECT,
            TypeEntry {
                iterate: Some(iterate_object),
                set_value: Some(set_value_object),
                ..TypeEntry::default()
            },
        );
        r.register(
            TYPE_ARRAY,
            TypeEntry {
                iterate: Some(iterate_array),
                set_value: Some(set_value_array),
                ..TypeEntry::default()
            },
        );
        r.register_pair(TYPE_UNDEF, serialize_undef, deserialize_undef);
        r.register_pair("Date", serialize_date, deserialize_date);
        r.register_pair("RegExp", serialize_regexp, deserialize_regexp);

        if caps.functions {
            r.register_pair("Function", serialize_function, deserialize_function);
        }
        if caps.bigint {
            r.register_pair("BigInt", serialize_bigint, deserialize_bigint);
        }
        if caps.buffer {
            r.register_pair("Buffer", serialize_buffer, deserialize_buffer);
        }
        if caps.collections {
            r.register(
                "Map",
                TypeEntry {
                    serialize: Some(serialize_map),
                    iterate: Some(iterate_map),
                    set_value: Some(set_value_map),
                    ..TypeEntry::default()
                },
            );
            r.register_serialized("Map", deserialize_map);
            r.register(
                "Set",
                TypeEntry {
                    serialize: Some(serialize_set),
                    iterate: Some(iterate_set),
                    set_value: Some(set_value_set),
                    ..TypeEntry::default()
                },
            );
            r.register_serialized("Set", deserialize_set);
        }
        if caps.typed_arrays {
            for kind in [
                "Int8Array",
                "Uint8Array",
                "Uint8ClampedArray",
                "Int16Array",
                "Uint16Array",
                "Int32Array",
                "Uint32Array",
                "Float32Array",
                "Float64Array",
            ] {
                r.register_pair(kind, serialize_typed_array, deserialize_typed_array);
            }
        }
        if caps.bigint_typed_arrays {
            for kind in ["BigInt64Array", "BigUint64Array"] {
                r.register_pair(kind, serialize_typed_array, deserialize_typed_array);
            }
        }
        if caps.weak_collections {
            for kind in ["WeakMap", "WeakSet", "WeakRef"] {
                r.register(
                    kind,
                    TypeEntry {
                        serialize: Some(serialize_weak),
                        ..TypeEntry::default()
                    },
                );
            }
        }

        // Custom-constructed values: the live form and the tagged wire form
        // share the same dedicated tag, so one entry carries all four
        // operations.
        r.register(
            TAG_CUSTOM_OBJECT,
            TypeEntry {
                serialize: Some(serialize_custom_object),
                deserialize: Some(deserialize_custom_object),
                iterate: Some(iterate_custom),
                set_value: Some(set_value_custom),
            },
        );
        r.register(
            TAG_CUSTOM_ARRAY,
            TypeEntry {
                serialize: Some(serialize_custom_array),
                deserialize: Some(deserialize_custom_array),
                iterate: Some(iterate_custom),
                set_value: Some(set_value_custom),
            },
        );

        r
    }

    /// The process-wide default registry (all capabilities on, no
    /// constructor bindings). Initialized once, read-only thereafter.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(|| Registry::new(Capabilities::default()))
    }

    /// Register a bundle under a discriminator. Startup-time only: the
    /// `&mut self` receiver keeps post-construction mutation out of the
    /// encode/decode paths.
    pub fn register(&mut self, discriminator: &str, entry: TypeEntry) {
        self.entries.insert(discriminator.to_string(), entry);
    }

    fn register_serialized(&mut self, name: &str, deserialize: DeserializeFn) {
        self.entries.insert(
            format!("{name}{SERIALIZED_SUFFIX}"),
            TypeEntry {
                deserialize: Some(deserialize),
                ..TypeEntry::default()
            },
        );
    }

    fn register_pair(&mut self, name: &str, serialize: SerializeFn, deserialize: DeserializeFn) {
        self.register(
            name,
            TypeEntry {
                serialize: Some(serialize),
                ..TypeEntry::default()
            },
        );
        self.register_serialized(name, deserialize);
    }

    /// Bind a constructor name to a factory producing a fresh instance.
    /// Bound constructors are consulted before the resolver during decode.
    pub fn bind_constructor(
        &mut self,
        name: &str,
        factory: impl Fn() -> SaValue + Send + Sync + 'static,
    ) {
        self.constructors.insert(name.to_string(), Box::new(factory));
    }

    /// Look a bundle up by exact discriminator match. Unknown discriminators
    /// get the inert empty bundle.
    pub fn lookup(&self, discriminator: &str) -> &TypeEntry {
        self.entries.get(discriminator).unwrap_or(&EMPTY_ENTRY)
    }

    pub fn contains(&self, discriminator: &str) -> bool {
        self.entries.contains_key(discriminator)
    }

    pub fn constructor(&self, name: &str) -> Option<&(dyn Fn() -> SaValue + Send + Sync)> {
        self.constructors.get(name).map(|f| f.as_ref())
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

// ----------------------------------------------------------------
// Shared helpers

fn tagged(tag: &str, fields: Vec<(String, SaValue)>) -> SaValue {
    let mut pairs = Vec::with_capacity(fields.len() + 1);
    pairs.push((TYPE_FIELD.to_string(), SaValue::Str(tag.to_string())));
    pairs.extend(fields);
    SaValue::Object(pairs)
}

fn set_prop(pairs: &mut Vec<(String, SaValue)>, name: String, value: SaValue) {
    match pairs.iter_mut().find(|(k, _)| *k == name) {
        Some(slot) => slot.1 = value,
        None => pairs.push((name, value)),
    }
}

// ----------------------------------------------------------------
// Plain containers

fn iterate_object(value: &SaValue, registry: &Registry) -> Vec<ElementInfo> {
    let SaValue::Object(pairs) = value else {
        return Vec::new();
    };
    pairs
        .iter()
        .map(|(k, v)| ElementInfo {
            key: ElementKey::Property(k.clone()),
            type_name: classify(v, registry),
            value: v.clone(),
            original_value: None,
        })
        .collect()
}

fn set_value_object(container: &mut SaValue, info: ElementInfo) {
    let SaValue::Object(pairs) = container else {
        return;
    };
    let ElementInfo { key, value, .. } = info;
    if let ElementKey::Property(name) = key {
        set_prop(pairs, name, value);
    }
}

fn iterate_array(value: &SaValue, registry: &Registry) -> Vec<ElementInfo> {
    let SaValue::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| ElementInfo {
            key: ElementKey::Index(i),
            type_name: classify(v, registry),
            value: v.clone(),
            original_value: None,
        })
        .collect()
}

fn set_value_array(container: &mut SaValue, info: ElementInfo) {
    let SaValue::Array(items) = container else {
        return;
    };
    let ElementInfo { key, value, .. } = info;
    if let ElementKey::Index(i) = key {
        if i < items.len() {
            items[i] = value;
        }
    }
}

// ----------------------------------------------------------------
// undef

fn serialize_undef(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Undefined => Ok(tagged(TYPE_UNDEF, Vec::new())),
        other => Ok(other.clone()),
    }
}

fn deserialize_undef(_plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    Ok(SaValue::Undefined)
}

// ----------------------------------------------------------------
// Date

fn serialize_date(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Date { timestamp_ms } => Ok(tagged(
            "Date",
            vec![(FIELD_TIMESTAMP.to_string(), SaValue::Integer(*timestamp_ms))],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_date(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let timestamp_ms = plain
        .field(FIELD_TIMESTAMP)
        .and_then(SaValue::as_i64)
        .ok_or(DecodeError::Format("malformed Date payload"))?;
    Ok(SaValue::Date { timestamp_ms })
}

// ----------------------------------------------------------------
// RegExp

fn serialize_regexp(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::RegExp { source, flags } => Ok(tagged(
            "RegExp",
            vec![
                (FIELD_SOURCE.to_string(), SaValue::Str(source.clone())),
                (FIELD_FLAGS.to_string(), SaValue::Str(flags.clone())),
            ],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_regexp(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let source = plain
        .field(FIELD_SOURCE)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed RegExp payload"))?;
    let flags = plain
        .field(FIELD_FLAGS)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed RegExp payload"))?;
    Ok(SaValue::RegExp {
        source: source.to_string(),
        flags: flags.to_string(),
    })
}

// ----------------------------------------------------------------
// Function (source text only)

fn serialize_function(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Function { source } => Ok(tagged(
            "Function",
            vec![(FIELD_FUNCTION_STRING.to_string(), SaValue::Str(source.clone()))],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_function(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let source = plain
        .field(FIELD_FUNCTION_STRING)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed Function payload"))?;
    Ok(SaValue::Function {
        source: source.to_string(),
    })
}

// ----------------------------------------------------------------
// BigInt

fn serialize_bigint(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::BigInt(n) => Ok(tagged(
            "BigInt",
            vec![(FIELD_NUM.to_string(), SaValue::Str(n.to_string()))],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_bigint(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let n = plain
        .field(FIELD_NUM)
        .and_then(SaValue::as_str)
        .and_then(|s| s.parse::<i128>().ok())
        .ok_or(DecodeError::Format("malformed BigInt payload"))?;
    Ok(SaValue::BigInt(n))
}

// ----------------------------------------------------------------
// Buffer

fn serialize_buffer(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Bytes(bytes) => Ok(tagged(
            "Buffer",
            vec![(
                FIELD_UTF8_STRING.to_string(),
                SaValue::Str(String::from_utf8_lossy(bytes).into_owned()),
            )],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_buffer(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let text = plain
        .field(FIELD_UTF8_STRING)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed Buffer payload"))?;
    Ok(SaValue::Bytes(text.as_bytes().to_vec()))
}

// ----------------------------------------------------------------
// Map

fn serialize_map(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Map(entries) => {
            let pairs: Vec<SaValue> = entries
                .iter()
                .map(|(k, v)| SaValue::Array(vec![k.clone(), v.clone()]))
                .collect();
            Ok(tagged(
                "Map",
                vec![(FIELD_KV_PAIRS.to_string(), SaValue::Array(pairs))],
            ))
        }
        other => Ok(other.clone()),
    }
}

fn deserialize_map(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let SaValue::Array(pairs) = plain
        .field(FIELD_KV_PAIRS)
        .ok_or(DecodeError::Format("malformed Map payload"))?
    else {
        return Err(DecodeError::Format("malformed Map payload"));
    };
    let mut entries = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let SaValue::Array(kv) = pair else {
            return Err(DecodeError::Format("malformed Map payload"));
        };
        if kv.len() != 2 {
            return Err(DecodeError::Format("malformed Map payload"));
        }
        entries.push((kv[0].clone(), kv[1].clone()));
    }
    Ok(SaValue::Map(entries))
}

fn iterate_map(value: &SaValue, registry: &Registry) -> Vec<ElementInfo> {
    let SaValue::Map(entries) = value else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(entries.len() * 2);
    for (i, (k, v)) in entries.iter().enumerate() {
        out.push(ElementInfo {
            key: ElementKey::MapKey(i),
            type_name: classify(k, registry),
            value: k.clone(),
            original_value: None,
        });
        out.push(ElementInfo {
            key: ElementKey::MapValue(i),
            type_name: classify(v, registry),
            value: v.clone(),
            original_value: None,
        });
    }
    out
}

fn set_value_map(container: &mut SaValue, info: ElementInfo) {
    let SaValue::Map(entries) = container else {
        return;
    };
    let ElementInfo { key, value, .. } = info;
    match key {
        ElementKey::MapKey(i) if i < entries.len() => entries[i].0 = value,
        ElementKey::MapValue(i) if i < entries.len() => entries[i].1 = value,
        _ => {}
    }
}

// ----------------------------------------------------------------
// Set

fn serialize_set(value: &SaValue) -> Result<SaValue, EncodeError> {
    match value {
        SaValue::Set(values) => Ok(tagged(
            "Set",
            vec![(FIELD_VALUES.to_string(), SaValue::Array(values.clone()))],
        )),
        other => Ok(other.clone()),
    }
}

fn deserialize_set(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    match plain.field(FIELD_VALUES) {
        Some(SaValue::Array(values)) => Ok(SaValue::Set(values.clone())),
        _ => Err(DecodeError::Format("malformed Set payload")),
    }
}

fn iterate_set(value: &SaValue, registry: &Registry) -> Vec<ElementInfo> {
    let SaValue::Set(values) = value else {
        return Vec::new();
    };
    values
        .iter()
        .map(|v| ElementInfo {
            key: ElementKey::Identity,
            type_name: classify(v, registry),
            value: v.clone(),
            original_value: Some(v.clone()),
        })
        .collect()
}

/// Identity-keyed replacement: the original element is removed before the
/// replacement is inserted, so a replaced element is never duplicated.
/// With duplicate-by-value entries the first match is removed; per-element
/// semantics for such sets are ambiguous and deliberately unspecified.
fn set_value_set(container: &mut SaValue, info: ElementInfo) {
    let SaValue::Set(values) = container else {
        return;
    };
    let ElementInfo {
        value,
        original_value,
        ..
    } = info;
    if let Some(original) = original_value {
        if let Some(pos) = values.iter().position(|v| *v == original) {
            values.remove(pos);
        }
    }
    values.push(value);
}

// ----------------------------------------------------------------
// Typed arrays

fn serialize_typed_array(value: &SaValue) -> Result<SaValue, EncodeError> {
    let SaValue::TypedArray(ta) = value else {
        return Ok(value.clone());
    };
    let values: Vec<SaValue> = match ta {
        TypedArray::Int8(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Uint8(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Uint8Clamped(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Int16(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Uint16(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Int32(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Uint32(v) => v.iter().map(|&n| SaValue::Integer(n as i64)).collect(),
        TypedArray::Float32(v) => v.iter().map(|&n| SaValue::Float(n as f64)).collect(),
        TypedArray::Float64(v) => v.iter().map(|&n| SaValue::Float(n)).collect(),
        // 64-bit element kinds travel as decimal strings: their full range
        // does not survive a JSON f64 number.
        TypedArray::BigInt64(v) => v.iter().map(|n| SaValue::Str(n.to_string())).collect(),
        TypedArray::BigUint64(v) => v.iter().map(|n| SaValue::Str(n.to_string())).collect(),
    };
    Ok(tagged(
        ta.kind_name(),
        vec![(FIELD_VALUES.to_string(), SaValue::Array(values))],
    ))
}

fn deserialize_typed_array(plain: &SaValue, _ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    const MALFORMED: DecodeError = DecodeError::Format("malformed typed array payload");
    let kind = plain.type_tag().ok_or(MALFORMED)?.to_string();
    let SaValue::Array(items) = plain.field(FIELD_VALUES).ok_or(MALFORMED)? else {
        return Err(MALFORMED);
    };

    fn ints(items: &[SaValue]) -> Result<Vec<i64>, DecodeError> {
        items
            .iter()
            .map(|v| v.as_i64().ok_or(MALFORMED))
            .collect()
    }
    fn floats(items: &[SaValue]) -> Result<Vec<f64>, DecodeError> {
        items
            .iter()
            .map(|v| v.as_f64().ok_or(MALFORMED))
            .collect()
    }
    fn parsed<T: std::str::FromStr>(items: &[SaValue]) -> Result<Vec<T>, DecodeError> {
        items
            .iter()
            .map(|v| {
                v.as_str()
                    .and_then(|s| s.parse::<T>().ok())
                    .ok_or(MALFORMED)
            })
            .collect()
    }

    let ta = match kind.as_str() {
        "Int8Array" => TypedArray::Int8(ints(items)?.into_iter().map(|n| n as i8).collect()),
        "Uint8Array" => TypedArray::Uint8(ints(items)?.into_iter().map(|n| n as u8).collect()),
        "Uint8ClampedArray" => {
            TypedArray::Uint8Clamped(ints(items)?.into_iter().map(|n| n as u8).collect())
        }
        "Int16Array" => TypedArray::Int16(ints(items)?.into_iter().map(|n| n as i16).collect()),
        "Uint16Array" => TypedArray::Uint16(ints(items)?.into_iter().map(|n| n as u16).collect()),
        "Int32Array" => TypedArray::Int32(ints(items)?.into_iter().map(|n| n as i32).collect()),
        "Uint32Array" => TypedArray::Uint32(ints(items)?.into_iter().map(|n| n as u32).collect()),
        "Float32Array" => {
            TypedArray::Float32(floats(items)?.into_iter().map(|n| n as f32).collect())
        }
        "Float64Array" => TypedArray::Float64(floats(items)?),
        "BigInt64Array" => TypedArray::BigInt64(parsed::<i64>(items)?),
        "BigUint64Array" => TypedArray::BigUint64(parsed::<u64>(items)?),
        _ => return Err(MALFORMED),
    };
    Ok(SaValue::TypedArray(ta))
}

// ----------------------------------------------------------------
// Weak collections

fn serialize_weak(value: &SaValue) -> Result<SaValue, EncodeError> {
    let kind = match value {
        SaValue::Weak(k) => k.name(),
        _ => "weak collection",
    };
    Err(EncodeError::UnsupportedType(kind.to_string()))
}

// ----------------------------------------------------------------
// Custom-constructed values

fn serialize_custom_object(value: &SaValue) -> Result<SaValue, EncodeError> {
    let SaValue::Custom(custom) = value else {
        // Already-tagged wire forms pass through untouched.
        return Ok(value.clone());
    };
    let CustomPayload::Object(props) = &custom.payload else {
        return Ok(value.clone());
    };
    Ok(tagged(
        TAG_CUSTOM_OBJECT,
        vec![
            (
                FIELD_CONSTRUCTOR_NAME.to_string(),
                SaValue::Str(custom.constructor.clone()),
            ),
            (FIELD_OBJECT.to_string(), SaValue::Object(props.clone())),
        ],
    ))
}

fn serialize_custom_array(value: &SaValue) -> Result<SaValue, EncodeError> {
    let SaValue::Custom(custom) = value else {
        return Ok(value.clone());
    };
    let CustomPayload::Array(values) = &custom.payload else {
        return Ok(value.clone());
    };
    Ok(tagged(
        TAG_CUSTOM_ARRAY,
        vec![
            (
                FIELD_CONSTRUCTOR_NAME.to_string(),
                SaValue::Str(custom.constructor.clone()),
            ),
            (FIELD_VALUES.to_string(), SaValue::Array(values.clone())),
        ],
    ))
}

/// Obtain a fresh instance for a constructor name: bound constructors win,
/// then the caller-supplied resolver.
fn resolve_instance(name: &str, ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    if let Some(factory) = ctx.registry.constructor(name) {
        return Ok(factory());
    }
    match ctx.resolver {
        Some(resolver) => resolver
            .resolve(name)
            .ok_or_else(|| DecodeError::UnsupportedType(name.to_string())),
        None => Err(DecodeError::MissingResolver(name.to_string())),
    }
}

fn deserialize_custom_object(plain: &SaValue, ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let name = plain
        .field(FIELD_CONSTRUCTOR_NAME)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed custom object payload"))?
        .to_string();
    let props = match plain.field(FIELD_OBJECT) {
        Some(SaValue::Object(props)) => props.clone(),
        _ => return Err(DecodeError::Format("malformed custom object payload")),
    };
    let instance = resolve_instance(&name, ctx)?;
    Ok(copy_properties(instance, props))
}

fn deserialize_custom_array(plain: &SaValue, ctx: &DecodeCtx<'_>) -> Result<SaValue, DecodeError> {
    let name = plain
        .field(FIELD_CONSTRUCTOR_NAME)
        .and_then(SaValue::as_str)
        .ok_or(DecodeError::Format("malformed custom array payload"))?
        .to_string();
    let values = match plain.field(FIELD_VALUES) {
        Some(SaValue::Array(values)) => values.clone(),
        _ => return Err(DecodeError::Format("malformed custom array payload")),
    };
    let instance = resolve_instance(&name, ctx)?;
    Ok(copy_values(instance, values))
}

/// Copy the snapshot's own properties onto a fresh instance, overwriting
/// any defaults the instance carries.
fn copy_properties(instance: SaValue, props: Vec<(String, SaValue)>) -> SaValue {
    match instance {
        SaValue::Custom(mut custom) => {
            if let CustomPayload::Object(existing) = &mut custom.payload {
                for (k, v) in props {
                    set_prop(existing, k, v);
                }
            }
            SaValue::Custom(custom)
        }
        SaValue::Object(mut pairs) => {
            for (k, v) in props {
                set_prop(&mut pairs, k, v);
            }
            SaValue::Object(pairs)
        }
        other => other,
    }
}

fn copy_values(instance: SaValue, values: Vec<SaValue>) -> SaValue {
    match instance {
        SaValue::Custom(mut custom) => {
            if let CustomPayload::Array(existing) = &mut custom.payload {
                *existing = values;
            }
            SaValue::Custom(custom)
        }
        SaValue::Array(_) => SaValue::Array(values),
        other => other,
    }
}

fn iterate_custom(value: &SaValue, registry: &Registry) -> Vec<ElementInfo> {
    let SaValue::Custom(custom) = value else {
        return Vec::new();
    };
    match &custom.payload {
        CustomPayload::Object(props) => props
            .iter()
            .map(|(k, v)| ElementInfo {
                key: ElementKey::Property(k.clone()),
                type_name: classify(v, registry),
                value: v.clone(),
                original_value: None,
            })
            .collect(),
        CustomPayload::Array(values) => values
            .iter()
            .enumerate()
            .map(|(i, v)| ElementInfo {
                key: ElementKey::Index(i),
                type_name: classify(v, registry),
                value: v.clone(),
                original_value: None,
            })
            .collect(),
    }
}

fn set_value_custom(container: &mut SaValue, info: ElementInfo) {
    let SaValue::Custom(custom) = container else {
        return;
    };
    let ElementInfo { key, value, .. } = info;
    match (&mut custom.payload, key) {
        (CustomPayload::Object(props), ElementKey::Property(name)) => set_prop(props, name, value),
        (CustomPayload::Array(values), ElementKey::Index(i)) if i < values.len() => {
            values[i] = value
        }
        _ => {}
    }
}
