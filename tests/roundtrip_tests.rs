//! Round-trip and size-agreement coverage across the composable shapes.

use std::collections::{BTreeMap, HashMap};

use tinybin::{decode_new, encode, size_of, TinybinObject};

fn roundtrip<T>(value: &T)
where
    T: tinybin::Serializable + Default + PartialEq + std::fmt::Debug,
{
    let bytes = encode(value).expect("encode");
    assert_eq!(
        bytes.len(),
        size_of(value).expect("size"),
        "size pass disagrees with encode for {value:?}"
    );
    let back: T = decode_new(&bytes).expect("decode");
    assert_eq!(&back, value);
}

#[test]
fn primitives() {
    roundtrip(&true);
    roundtrip(&false);
    roundtrip(&0x7Bu8);
    roundtrip(&-5i8);
    roundtrip(&0xBEEFu16);
    roundtrip(&-12345i16);
    roundtrip(&0xDEAD_BEEFu32);
    roundtrip(&i32::MIN);
    roundtrip(&u64::MAX);
    roundtrip(&i64::MIN);
    roundtrip(&3.5f32);
    roundtrip(&-0.1f64);
    roundtrip(&isize::MIN);
    roundtrip(&usize::MAX);
    roundtrip(&tinybin::Complex::new(1.5f32, -2.5f32));
    roundtrip(&tinybin::Complex::new(1e300f64, -1e-300f64));
}

#[test]
fn strings() {
    roundtrip(&String::new());
    roundtrip(&"hello".to_string());
    roundtrip(&"héllo wörld — ünïcode".to_string());
    roundtrip(&"x".repeat(1000));
}

#[test]
fn sequences() {
    roundtrip(&Vec::<u32>::new());
    roundtrip(&vec![1u32, 2, 3]);
    roundtrip(&vec!["a".to_string(), String::new(), "ccc".to_string()]);
    roundtrip(&vec![vec![1i64, -2], vec![], vec![3]]);
    roundtrip(&(0..100).map(|i| i % 3 == 0).collect::<Vec<bool>>());
    roundtrip(&vec![0u8; 300]);
    roundtrip(&[1u16, 2, 3]);
    roundtrip(&[true, false, true, true, false, false, true, true, true]);
    roundtrip(&[[1u8, 2], [3, 4], [5, 6]]);
}

#[test]
fn mappings() {
    let mut hm = HashMap::new();
    hm.insert("one".to_string(), 1u32);
    hm.insert("two".to_string(), 2);
    hm.insert(String::new(), 0);
    roundtrip(&hm);

    let mut bt = BTreeMap::new();
    bt.insert(-3i32, vec![1u8, 2, 3]);
    bt.insert(7, vec![]);
    roundtrip(&bt);

    roundtrip(&HashMap::<u64, String>::new());
}

#[test]
fn options() {
    roundtrip(&Some(42u32));
    roundtrip(&Option::<u32>::None);
    roundtrip(&Some("boxed".to_string()));
    roundtrip(&vec![Some(1u8), None, Some(3)]);
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct Inner {
    tag: u8,
    label: String,
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct Outer {
    id: u32,
    inner: Inner,
    notes: Vec<String>,
    ratio: f64,
    maybe: Option<Inner>,
    counts: HashMap<String, u64>,
    flags: [bool; 12],
    window: isize,
}

#[test]
fn nested_struct() {
    let mut counts = HashMap::new();
    counts.insert("hits".to_string(), 991);
    let mut v = Outer {
        id: 41,
        inner: Inner {
            tag: 7,
            label: "core".to_string(),
        },
        notes: vec!["a".to_string(), "b".to_string()],
        ratio: 0.25,
        maybe: Some(Inner {
            tag: 1,
            label: String::new(),
        }),
        counts,
        flags: [false; 12],
        window: -40,
    };
    v.flags[3] = true;
    v.flags[11] = true;
    roundtrip(&v);

    roundtrip(&Outer::default());
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct Node {
    val: u32,
    next: Option<Box<Node>>,
}

#[test]
fn recursive_type_through_box() {
    let list = Node {
        val: 1,
        next: Some(Box::new(Node {
            val: 2,
            next: Some(Box::new(Node { val: 3, next: None })),
        })),
    };
    roundtrip(&list);
}

#[test]
fn double_pointer_is_rejected() {
    let v: Option<Option<u32>> = Some(Some(5));
    assert!(size_of(&v).is_none());
    let err = encode(&v).unwrap_err();
    assert!(matches!(err, tinybin::TinybinError::UnsupportedKind(_)));
}

#[test]
fn skip_consumes_exactly_one_value() {
    let mut bytes = encode(&"skip me".to_string()).unwrap();
    bytes.extend(encode(&0xAABBu16).unwrap());

    let mut dec = tinybin::Decoder::new(&bytes);
    let skipped = dec.skip::<String>().unwrap();
    assert_eq!(skipped, 1 + 7);
    assert_eq!(dec.u16().unwrap(), 0xAABB);
}

#[test]
fn skip_mirrors_decode_for_structs() {
    let v = Node {
        val: 9,
        next: Some(Box::new(Node { val: 10, next: None })),
    };
    let bytes = encode(&v).unwrap();
    let mut dec = tinybin::Decoder::new(&bytes);
    assert_eq!(dec.skip::<Node>().unwrap(), bytes.len());
    assert_eq!(dec.remaining(), 0);
}
