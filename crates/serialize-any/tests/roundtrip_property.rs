use proptest::prelude::*;
use serialize_any::{decode, encode, EncodeOptions, SaValue, TypedArray};

/// Structural equality with unordered set comparison; element order inside
/// sets is not a round-trip guarantee.
fn sa_eq(a: &SaValue, b: &SaValue) -> bool {
    match (a, b) {
        (SaValue::Set(x), SaValue::Set(y)) => {
            if x.len() != y.len() {
                return false;
            }
            let mut used = vec![false; y.len()];
            for e in x {
                match (0..y.len()).find(|&i| !used[i] && sa_eq(e, &y[i])) {
                    Some(i) => used[i] = true,
                    None => return false,
                }
            }
            true
        }
        (SaValue::Array(x), SaValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(e, f)| sa_eq(e, f))
        }
        (SaValue::Object(x), SaValue::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((k1, v1), (k2, v2))| k1 == k2 && sa_eq(v1, v2))
        }
        (SaValue::Map(x), SaValue::Map(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((k1, v1), (k2, v2))| sa_eq(k1, k2) && sa_eq(v1, v2))
        }
        _ => a == b,
    }
}

fn arb_value() -> impl Strategy<Value = SaValue> {
    let leaf = prop_oneof![
        Just(SaValue::Null),
        Just(SaValue::Undefined),
        any::<bool>().prop_map(SaValue::Bool),
        any::<i64>().prop_map(SaValue::Integer),
        (-1.0e12f64..1.0e12).prop_map(SaValue::Float),
        "[a-z0-9 ]{0,12}".prop_map(SaValue::Str),
        any::<i64>().prop_map(|n| SaValue::BigInt(i128::from(n) * 31)),
        any::<i64>().prop_map(|timestamp_ms| SaValue::Date { timestamp_ms }),
        ("[a-z]{1,6}", "[gimsu]{0,3}")
            .prop_map(|(source, flags)| SaValue::RegExp { source, flags }),
        prop::collection::vec(any::<u8>(), 0..16)
            .prop_map(|v| SaValue::TypedArray(TypedArray::Uint8(v))),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(SaValue::Array),
            prop::collection::hash_map("[a-z]{1,6}", inner.clone(), 0..4)
                .prop_map(|m| SaValue::Object(m.into_iter().collect())),
            prop::collection::vec((inner.clone(), inner.clone()), 0..3)
                .prop_map(SaValue::Map),
            prop::collection::vec(inner, 0..3).prop_map(SaValue::Set),
        ]
    })
}

proptest! {
    #[test]
    fn every_generated_value_roundtrips(value in arb_value()) {
        let text = encode(&value, &EncodeOptions::default()).unwrap();
        let back = decode(&text, None).unwrap();
        prop_assert!(sa_eq(&back, &value), "mismatch:\n {value:?}\n {back:?}");
    }

    #[test]
    fn pretty_and_compact_text_decode_identically(value in arb_value()) {
        let compact = encode(&value, &EncodeOptions::default()).unwrap();
        let pretty = encode(&value, &EncodeOptions { pretty: true, ..EncodeOptions::default() }).unwrap();
        let a = decode(&compact, None).unwrap();
        let b = decode(&pretty, None).unwrap();
        prop_assert!(sa_eq(&a, &b));
    }
}
