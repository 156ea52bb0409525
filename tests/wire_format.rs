//! Pins the exact byte layout of the wire format.

use tinybin::{decode_new, encode, Decoder, Encoder, Endian, TinybinError, TinybinObject};

#[test]
fn uvarint_bytes() {
    assert_eq!(encode(&1usize).unwrap(), vec![0x01]);
    assert_eq!(encode(&128usize).unwrap(), vec![0x80, 0x01]);
    assert_eq!(encode(&32765usize).unwrap(), vec![0xFD, 0xFF, 0x01]);
}

#[test]
fn varint_bytes() {
    assert_eq!(encode(&-5isize).unwrap(), vec![0x09]);
    assert_eq!(encode(&-65isize).unwrap(), vec![0x81, 0x01]);
    assert_eq!(encode(&0isize).unwrap(), vec![0x00]);
}

#[test]
fn varint_boundary_lengths() {
    let cases: &[(u64, usize)] = &[
        (0, 1),
        (127, 1),
        (128, 2),
        (16383, 2),
        (16384, 3),
        (u64::from(u32::MAX), 5),
        (u64::MAX, 10),
    ];
    let mut buf = [0u8; 16];
    for &(value, expected) in cases {
        let mut enc = Encoder::new(&mut buf);
        assert_eq!(enc.uvarint(value).unwrap(), expected, "uvarint({value})");
        let mut dec = Decoder::new(enc.buffer());
        assert_eq!(dec.uvarint().unwrap(), value);
        assert_eq!(dec.pos(), expected);
    }
}

#[test]
fn string_bytes() {
    assert_eq!(
        encode(&"hello".to_string()).unwrap(),
        vec![0x05, 0x68, 0x65, 0x6C, 0x6C, 0x6F]
    );
}

#[test]
fn bool_sequence_bits() {
    let bits = vec![true, true, true, false, true, true, false, false, true];
    assert_eq!(encode(&bits).unwrap(), vec![0x09, 0x37, 0x01]);
    assert_eq!(decode_new::<Vec<bool>>(&[0x09, 0x37, 0x01]).unwrap(), bits);
}

#[test]
fn bool_decode_ignores_trailing_bits() {
    // Three booleans, but the unused high bits of the byte are set.
    let decoded = decode_new::<Vec<bool>>(&[0x03, 0xFF]).unwrap();
    assert_eq!(decoded, vec![true, true, true]);
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct MostlyIgnored {
    a: u32,
    _b: u32,
    #[tinybin(ignore)]
    c: u32,
}

#[test]
fn ignored_fields_contribute_nothing() {
    let v = MostlyIgnored {
        a: 0,
        _b: 77,
        c: 99,
    };
    let bytes = encode(&v).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00]);

    let back: MostlyIgnored = decode_new(&bytes).unwrap();
    assert_eq!(back._b, 0);
    assert_eq!(back.c, 0);
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct MaybeInt {
    p: Option<i32>,
}

#[test]
fn nil_pointer_is_one_presence_byte() {
    let bytes = encode(&MaybeInt { p: None }).unwrap();
    assert_eq!(bytes, vec![0x00]);
    let back: MaybeInt = decode_new(&bytes).unwrap();
    assert_eq!(back.p, None);
}

#[test]
fn present_pointer_is_presence_byte_plus_payload() {
    let bytes = encode(&MaybeInt { p: Some(-2) }).unwrap();
    assert_eq!(bytes.len(), 5);
    assert_eq!(bytes[0], 0x01);
    let back: MaybeInt = decode_new(&bytes).unwrap();
    assert_eq!(back.p, Some(-2));
}

#[test]
fn fixed_width_endianness() {
    let mut buf = [0u8; 8];
    let mut enc = Encoder::with_endian(&mut buf, Endian::Big);
    enc.u32(0x0102_0304).unwrap();
    assert_eq!(enc.buffer(), &[1, 2, 3, 4]);

    let mut enc = Encoder::with_endian(&mut buf, Endian::Little);
    enc.u32(0x0102_0304).unwrap();
    assert_eq!(enc.buffer(), &[4, 3, 2, 1]);

    let mut dec = Decoder::with_endian(&[1, 2, 3, 4], Endian::Big);
    assert_eq!(dec.u32().unwrap(), 0x0102_0304);
}

#[test]
fn fixed_array_keeps_length_prefix() {
    let bytes = encode(&[0xAAAAu16; 3]).unwrap();
    assert_eq!(bytes.len(), 1 + 3 * 2);
    assert_eq!(bytes[0], 0x03);
}

#[test]
fn fixed_array_prefix_mismatch_is_an_error() {
    // Wire says two elements, target expects three.
    let err = decode_new::<[u16; 3]>(&[0x02, 0, 0, 0, 0]).unwrap_err();
    assert_eq!(
        err,
        TinybinError::LengthMismatch {
            expected: 3,
            found: 2
        }
    );
}

#[derive(Debug, Default, PartialEq, TinybinObject)]
struct FlagBlock {
    flags: [bool; 9],
}

#[test]
fn fixed_bool_array_elides_prefix_inside_struct() {
    let mut v = FlagBlock::default();
    v.flags[0] = true;
    v.flags[8] = true;
    // No length prefix: just ceil(9/8) = 2 packed bytes.
    let bytes = encode(&v).unwrap();
    assert_eq!(bytes, vec![0x01, 0x01]);
    assert_eq!(decode_new::<FlagBlock>(&bytes).unwrap(), v);
}

#[test]
fn top_level_bool_array_keeps_prefix() {
    let mut v = [false; 9];
    v[0] = true;
    v[8] = true;
    let bytes = encode(&v).unwrap();
    assert_eq!(bytes, vec![0x09, 0x01, 0x01]);
}

#[test]
fn complex_layout() {
    let c = tinybin::Complex::new(1.0f32, -1.0f32);
    let bytes = encode(&c).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(&bytes[..4], 1.0f32.to_bits().to_le_bytes().as_slice());
    let back: tinybin::Complex<f32> = decode_new(&bytes).unwrap();
    assert_eq!(back, c);
}

#[test]
fn malformed_varint_is_rejected() {
    // Eleven continuation bytes.
    let err = decode_new::<usize>(&[0x80; 11]).unwrap_err();
    assert_eq!(err, TinybinError::MalformedVarint);

    // Tenth byte overflows 64 bits.
    let mut overlong = [0x80u8; 10];
    overlong[9] = 0x02;
    let err = decode_new::<usize>(&overlong).unwrap_err();
    assert_eq!(err, TinybinError::MalformedVarint);
}

#[test]
fn short_read_mid_value() {
    let err = decode_new::<u32>(&[0x01, 0x02]).unwrap_err();
    assert!(matches!(err, TinybinError::ShortRead { .. }));
}

#[test]
fn trailing_bytes_are_not_an_error() {
    let v: u8 = decode_new(&[0x07, 0xFF, 0xFF]).unwrap();
    assert_eq!(v, 7);
}

#[test]
fn encode_into_reports_overflow() {
    let mut buf = [0u8; 2];
    let err = tinybin::encode_into(&"hello".to_string(), &mut buf).unwrap_err();
    assert!(matches!(err, TinybinError::NotEnoughSpace { .. }));
}
