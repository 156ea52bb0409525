//! Registration rules and the cached-metadata traversal path.
//!
//! The registry is process-wide and one-way, so every test uses its own
//! mock types to stay independent of execution order.

use tinybin::{decode_new, encode, register, size_of, TinybinError, TinybinObject};

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct Plain {
    x: u32,
    y: String,
}

#[test]
fn registration_is_idempotent_in_state_but_errors_on_repeat() {
    register::<Plain>().expect("first registration");
    let err = register::<Plain>().expect_err("second registration");
    assert_eq!(err, TinybinError::DuplicateRegistration(std::any::type_name::<Plain>()));

    // State is intact: the cached metadata still drives encoding.
    let v = Plain {
        x: 5,
        y: "ok".to_string(),
    };
    let bytes = encode(&v).unwrap();
    assert_eq!(decode_new::<Plain>(&bytes).unwrap(), v);
}

#[test]
fn non_struct_registration_is_rejected() {
    let err = register::<u32>().expect_err("u32 is not registrable");
    assert_eq!(
        err,
        TinybinError::ExpectedStructOrSerializer(std::any::type_name::<u32>())
    );
    assert!(register::<Vec<u32>>().is_err());
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct DeepInner {
    n: u16,
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct DeepOuter {
    direct: DeepInner,
    through_ptr: Option<DeepInner>,
}

#[test]
fn struct_registration_recurses_into_field_types() {
    register::<DeepOuter>().expect("register outer");
    // Field types were registered with need_error = false, including
    // through one level of pointer indirection.
    assert!(tinybin::struct_info::<DeepInner>().is_some());

    // And re-registering the field type explicitly now reports a duplicate.
    assert!(register::<DeepInner>().is_err());
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct MetaProbe {
    a: u8,
    #[tinybin(packed)]
    b: u64,
    _hidden: u32,
}

#[test]
fn struct_info_matches_declaration_order() {
    register::<MetaProbe>().expect("register");
    let info = tinybin::struct_info::<MetaProbe>().expect("cached");
    assert_eq!(info.name(), "MetaProbe");
    // One entry per declared field, ignored ones included.
    assert_eq!(info.num_fields(), 3);
    assert!(!info.field(0).unwrap().is_ignored());
    assert!(!info.field(0).unwrap().is_packed());
    assert!(info.field(1).unwrap().is_packed());
    assert!(info.field(2).unwrap().is_ignored());
    assert_eq!(info.field(1).unwrap().name(), "b");
    assert!(info.field(3).is_none());
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct EquivProbe {
    a: u32,
    s: String,
    f: [bool; 5],
}

#[test]
fn registered_and_unregistered_encodings_are_identical() {
    let v = EquivProbe {
        a: 123,
        s: "same bytes".to_string(),
        f: [true, false, true, false, true],
    };
    let before = encode(&v).unwrap();
    register::<EquivProbe>().expect("register");
    let after = encode(&v).unwrap();
    assert_eq!(before, after);
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct PackedProbe {
    #[tinybin(packed)]
    n: u64,
    #[tinybin(packed)]
    m: i32,
}

#[test]
fn packed_requires_registration() {
    let v = PackedProbe { n: 5, m: -3 };

    // Unregistered: packed is not honored, fixed widths apply.
    let before = encode(&v).unwrap();
    assert_eq!(before.len(), 8 + 4);
    assert_eq!(decode_new::<PackedProbe>(&before).unwrap(), v);

    // Registered: both fields become varints.
    register::<PackedProbe>().expect("register");
    let after = encode(&v).unwrap();
    assert_eq!(after, vec![0x05, 0x05]);
    assert_eq!(size_of(&v), Some(2));
    assert_eq!(decode_new::<PackedProbe>(&after).unwrap(), v);
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct FixedProbe {
    word: u32,
    flags: [bool; 12],
    tail: u8,
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct DynamicProbe {
    word: u32,
    name: String,
}

#[test]
fn fixed_payload_measurement() {
    register::<FixedProbe>().expect("register fixed");
    register::<DynamicProbe>().expect("register dynamic");

    let fixed = tinybin::struct_info::<FixedProbe>().unwrap();
    // u32 + elided bool block ceil(12/8) + u8.
    assert_eq!(fixed.fixed_payload_size(), Some(4 + 2 + 1));
    // Agrees with an actual encoding.
    assert_eq!(size_of(&FixedProbe::default()), Some(7));

    let dynamic = tinybin::struct_info::<DynamicProbe>().unwrap();
    assert_eq!(dynamic.fixed_payload_size(), None);

    assert_eq!(
        <FixedProbe as tinybin::Serializable>::DESC.fixed_size(),
        Some(7)
    );
    assert_eq!(<[u16; 4] as tinybin::Serializable>::DESC.fixed_size(), Some(1 + 8));
    assert_eq!(<String as tinybin::Serializable>::DESC.fixed_size(), None);
}
