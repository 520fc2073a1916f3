use serialize_any::{
    decode, decode_with_registry, encode, encode_with_registry, Capabilities, CustomPayload,
    DecodeError, EncodeError, EncodeOptions, Registry, Resolver, SaCustom, SaDecoder, SaValue,
    WeakKind,
};

fn obj(fields: &[(&str, SaValue)]) -> SaValue {
    SaValue::Object(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect(),
    )
}

fn nested(depth: usize) -> SaValue {
    let mut value = SaValue::Integer(1);
    for _ in 0..depth {
        value = obj(&[("a", value)]);
    }
    value
}

#[test]
fn decode_rejects_text_not_produced_by_this_format() {
    for text in [
        "{}",
        "null",
        "42",
        "\"string\"",
        "[1,2,3]",
        "{\"_SA_Content\": 1}",
        "{\"_Serialize_Any_Encoded\": false, \"_SA_Content\": 1}",
        "not json at all",
        "",
    ] {
        match decode(text, None) {
            Err(DecodeError::Format(_)) => {}
            other => panic!("expected format error for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn decode_rejects_envelope_without_content() {
    let result = decode("{\"_Serialize_Any_Encoded\": true}", None);
    assert!(matches!(result, Err(DecodeError::Format(_))));
}

#[test]
fn depth_budget_bounds_encoding() {
    let deep = nested(4);
    let shallow_budget = EncodeOptions {
        max_depth: 2,
        ..EncodeOptions::default()
    };
    assert_eq!(
        encode(&deep, &shallow_budget),
        Err(EncodeError::DepthExceeded(2))
    );
    let roomy_budget = EncodeOptions {
        max_depth: 10,
        ..EncodeOptions::default()
    };
    let text = encode(&deep, &roomy_budget).expect("depth 4 fits in budget 10");
    assert_eq!(decode(&text, None).unwrap(), deep);
}

#[test]
fn depth_budget_bounds_decoding() {
    let registry = Registry::new(Capabilities::default());
    let deep = nested(4);
    let shallow = SaDecoder::with_max_depth(&registry, 2);
    assert_eq!(
        shallow.decode(&deep, None),
        Err(DecodeError::DepthExceeded(2))
    );
    let roomy = SaDecoder::with_max_depth(&registry, 10);
    assert_eq!(roomy.decode(&deep, None).unwrap(), deep);
}

#[test]
fn pretty_output_is_equivalent() {
    let value = obj(&[
        ("when", SaValue::Date { timestamp_ms: 7 }),
        ("n", SaValue::Integer(1)),
    ]);
    let compact = encode(&value, &EncodeOptions::default()).unwrap();
    let pretty = encode(
        &value,
        &EncodeOptions {
            pretty: true,
            ..EncodeOptions::default()
        },
    )
    .unwrap();
    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    assert_eq!(decode(&compact, None).unwrap(), value);
    assert_eq!(decode(&pretty, None).unwrap(), value);
}

#[test]
fn weak_collections_fail_with_unsupported_type() {
    for kind in [WeakKind::WeakMap, WeakKind::WeakSet, WeakKind::WeakRef] {
        let result = encode(&SaValue::Weak(kind), &EncodeOptions::default());
        assert_eq!(result, Err(EncodeError::UnsupportedType(kind.name().into())));
    }
    // Nested weak collections fail the whole encode, never get swallowed.
    let value = obj(&[("cache", SaValue::Weak(WeakKind::WeakMap))]);
    assert_eq!(
        encode(&value, &EncodeOptions::default()),
        Err(EncodeError::UnsupportedType("WeakMap".into()))
    );
}

#[test]
fn unknown_tagged_content_passes_through_unchanged() {
    // Forward compatibility: a tag this registry has never heard of decodes
    // to the plain object itself, with no crash.
    let text = "{\"_Serialize_Any_Encoded\":true,\"_SA_Content\":{\"_SAType\":\"Frobnicator\",\"x\":1}}";
    let value = decode(text, None).unwrap();
    assert_eq!(
        value,
        obj(&[
            ("_SAType", SaValue::Str("Frobnicator".into())),
            ("x", SaValue::Integer(1)),
        ])
    );
}

#[test]
fn disabled_capabilities_leave_types_unregistered() {
    let registry = Registry::new(Capabilities {
        collections: false,
        ..Capabilities::default()
    });
    // With Map support off, the tagged wire form is just an unknown tag and
    // decodes as the plain object it is.
    let value = SaValue::Map(vec![(SaValue::Integer(1), SaValue::Integer(2))]);
    let full = Registry::new(Capabilities::default());
    let text = encode_with_registry(&full, &value, &EncodeOptions::default()).unwrap();
    let decoded = decode_with_registry(&registry, &text, None).unwrap();
    assert_eq!(decoded.type_tag(), Some("Map"));
    assert!(matches!(
        decoded.field("_SAkvPairs"),
        Some(SaValue::Array(_))
    ));
}

#[test]
fn encoding_a_live_value_with_its_capability_disabled_fails() {
    let registry = Registry::new(Capabilities {
        collections: false,
        ..Capabilities::default()
    });
    // The live value has no bundle able to produce a wire form; encoding
    // fails instead of degrading the value to null.
    let value = SaValue::Map(vec![(SaValue::Integer(1), SaValue::Integer(2))]);
    assert_eq!(
        encode_with_registry(&registry, &value, &EncodeOptions::default()),
        Err(EncodeError::UnsupportedType("Map".into()))
    );
    // Same when the live value sits inside an otherwise encodable object.
    let nested = obj(&[("members", SaValue::Set(Vec::new()))]);
    assert_eq!(
        encode_with_registry(&registry, &nested, &EncodeOptions::default()),
        Err(EncodeError::UnsupportedType("Set".into()))
    );
}

// ----------------------------------------------------------------
// Custom-type resolution

fn widget() -> SaValue {
    SaValue::Custom(Box::new(SaCustom {
        constructor: "Widget".into(),
        payload: CustomPayload::Object(vec![
            ("size".into(), SaValue::Integer(3)),
            ("born".into(), SaValue::Date { timestamp_ms: 42 }),
        ]),
    }))
}

struct WidgetResolver;

impl Resolver for WidgetResolver {
    fn resolve(&self, constructor_name: &str) -> Option<SaValue> {
        (constructor_name == "Widget").then(|| {
            SaValue::Custom(Box::new(SaCustom {
                constructor: "Widget".into(),
                payload: CustomPayload::Object(vec![(
                    "default_flag".into(),
                    SaValue::Bool(true),
                )]),
            }))
        })
    }
}

struct RefusingResolver;

impl Resolver for RefusingResolver {
    fn resolve(&self, _constructor_name: &str) -> Option<SaValue> {
        None
    }
}

#[test]
fn custom_decode_without_resolver_fails_with_missing_resolver() {
    let text = encode(&widget(), &EncodeOptions::default()).unwrap();
    assert_eq!(
        decode(&text, None),
        Err(DecodeError::MissingResolver("Widget".into()))
    );
}

#[test]
fn custom_decode_with_refusing_resolver_fails_with_unsupported_type() {
    let text = encode(&widget(), &EncodeOptions::default()).unwrap();
    assert_eq!(
        decode(&text, Some(&RefusingResolver)),
        Err(DecodeError::UnsupportedType("Widget".into()))
    );
}

#[test]
fn custom_decode_copies_properties_onto_resolved_instance() {
    let text = encode(&widget(), &EncodeOptions::default()).unwrap();
    let decoded = decode(&text, Some(&WidgetResolver)).unwrap();
    let SaValue::Custom(custom) = decoded else {
        panic!("expected a custom value, got {decoded:?}");
    };
    assert_eq!(custom.constructor, "Widget");
    let CustomPayload::Object(props) = &custom.payload else {
        panic!("expected object payload");
    };
    // Instance defaults survive; snapshot properties are copied on top,
    // with nested rich values fully restored.
    assert!(props.contains(&("default_flag".into(), SaValue::Bool(true))));
    assert!(props.contains(&("size".into(), SaValue::Integer(3))));
    assert!(props.contains(&("born".into(), SaValue::Date { timestamp_ms: 42 })));
}

#[test]
fn bound_constructors_win_over_the_resolver() {
    let mut registry = Registry::new(Capabilities::default());
    registry.bind_constructor("Widget", || {
        SaValue::Custom(Box::new(SaCustom {
            constructor: "Widget".into(),
            payload: CustomPayload::Object(vec![("bound".into(), SaValue::Bool(true))]),
        }))
    });
    let text = encode_with_registry(&registry, &widget(), &EncodeOptions::default()).unwrap();
    // No resolver supplied; the bound constructor carries the decode.
    let decoded = decode_with_registry(&registry, &text, None).unwrap();
    let SaValue::Custom(custom) = decoded else {
        panic!("expected a custom value");
    };
    let CustomPayload::Object(props) = &custom.payload else {
        panic!("expected object payload");
    };
    assert!(props.contains(&("bound".into(), SaValue::Bool(true))));
    assert!(props.contains(&("size".into(), SaValue::Integer(3))));
}

#[test]
fn custom_array_roundtrips_through_a_resolver() {
    let ring = SaValue::Custom(Box::new(SaCustom {
        constructor: "Ring".into(),
        payload: CustomPayload::Array(vec![
            SaValue::Integer(1),
            SaValue::Date { timestamp_ms: 9 },
        ]),
    }));
    struct RingResolver;
    impl Resolver for RingResolver {
        fn resolve(&self, constructor_name: &str) -> Option<SaValue> {
            (constructor_name == "Ring").then(|| {
                SaValue::Custom(Box::new(SaCustom {
                    constructor: "Ring".into(),
                    payload: CustomPayload::Array(Vec::new()),
                }))
            })
        }
    }
    let text = encode(&ring, &EncodeOptions::default()).unwrap();
    let decoded = decode(&text, Some(&RingResolver)).unwrap();
    assert_eq!(decoded, ring);
}
