//! `Serializable` implementations for the built-in kind set.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use num_complex::Complex;

use crate::decoder::Decoder;
use crate::desc::{Kind, TypeDesc};
use crate::encoder::Encoder;
use crate::error::{Result, TinybinError};
use crate::registry::SerializerSwitch;
use crate::serial::Serializable;
use crate::size;
use crate::varint::{uvarint_size, varint_size};

// --- PRIMITIVES ---

impl Serializable for bool {
    const DESC: &'static TypeDesc =
        &TypeDesc::new(Kind::Bool, TypeId::of::<bool>, type_name::<bool>);

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.bool(*self)
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        *self = dec.bool()?;
        Ok(())
    }

    fn size_value(&self, _packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
        Some(1)
    }

    fn get_bool(&self) -> Option<bool> {
        Some(*self)
    }

    fn set_bool(&mut self, v: bool) {
        *self = v;
    }
}

macro_rules! impl_signed_int {
    ($($t:ty => ($kind:expr, $method:ident, $width:expr)),* $(,)?) => {$(
        impl Serializable for $t {
            const DESC: &'static TypeDesc =
                &TypeDesc::new($kind, TypeId::of::<$t>, type_name::<$t>);

            fn encode_value(
                &self,
                enc: &mut Encoder<'_>,
                packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                if packed {
                    enc.varint(*self as i64).map(|_| ())
                } else {
                    enc.$method(*self)
                }
            }

            fn decode_value(
                &mut self,
                dec: &mut Decoder<'_>,
                packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                *self = if packed { dec.varint()? as $t } else { dec.$method()? };
                Ok(())
            }

            fn size_value(&self, packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
                Some(if packed { varint_size(*self as i64) } else { $width })
            }
        }
    )*};
}

macro_rules! impl_unsigned_int {
    ($($t:ty => ($kind:expr, $method:ident, $width:expr)),* $(,)?) => {$(
        impl Serializable for $t {
            const DESC: &'static TypeDesc =
                &TypeDesc::new($kind, TypeId::of::<$t>, type_name::<$t>);

            fn encode_value(
                &self,
                enc: &mut Encoder<'_>,
                packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                if packed {
                    enc.uvarint(*self as u64).map(|_| ())
                } else {
                    enc.$method(*self)
                }
            }

            fn decode_value(
                &mut self,
                dec: &mut Decoder<'_>,
                packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                *self = if packed { dec.uvarint()? as $t } else { dec.$method()? };
                Ok(())
            }

            fn size_value(&self, packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
                Some(if packed { uvarint_size(*self as u64) } else { $width })
            }
        }
    )*};
}

impl_signed_int! {
    i8  => (Kind::I8,  i8,  1),
    i16 => (Kind::I16, i16, 2),
    i32 => (Kind::I32, i32, 4),
    i64 => (Kind::I64, i64, 8),
}

impl_unsigned_int! {
    u8  => (Kind::U8,  u8,  1),
    u16 => (Kind::U16, u16, 2),
    u32 => (Kind::U32, u32, 4),
    u64 => (Kind::U64, u64, 8),
}

// Architecture-width integers are varint on the wire regardless of the
// platform's pointer width, so the packed flag changes nothing.

impl Serializable for isize {
    const DESC: &'static TypeDesc =
        &TypeDesc::new(Kind::Int, TypeId::of::<isize>, type_name::<isize>);

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.int(*self).map(|_| ())
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        *self = dec.int()?;
        Ok(())
    }

    fn size_value(&self, _packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
        Some(varint_size(*self as i64))
    }
}

impl Serializable for usize {
    const DESC: &'static TypeDesc =
        &TypeDesc::new(Kind::Uint, TypeId::of::<usize>, type_name::<usize>);

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.uint(*self).map(|_| ())
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        *self = dec.uint()?;
        Ok(())
    }

    fn size_value(&self, _packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
        Some(uvarint_size(*self as u64))
    }
}

macro_rules! impl_float {
    ($($t:ty => ($kind:expr, $method:ident, $width:expr)),* $(,)?) => {$(
        impl Serializable for $t {
            const DESC: &'static TypeDesc =
                &TypeDesc::new($kind, TypeId::of::<$t>, type_name::<$t>);

            fn encode_value(
                &self,
                enc: &mut Encoder<'_>,
                _packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                enc.$method(*self)
            }

            fn decode_value(
                &mut self,
                dec: &mut Decoder<'_>,
                _packed: bool,
                _serializer: SerializerSwitch,
            ) -> Result<()> {
                *self = dec.$method()?;
                Ok(())
            }

            fn size_value(&self, _packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
                Some($width)
            }
        }
    )*};
}

impl_float! {
    f32 => (Kind::F32, f32, 4),
    f64 => (Kind::F64, f64, 8),
    Complex<f32> => (Kind::Complex64, complex64, 8),
    Complex<f64> => (Kind::Complex128, complex128, 16),
}

impl Serializable for String {
    const DESC: &'static TypeDesc =
        &TypeDesc::new(Kind::Str, TypeId::of::<String>, type_name::<String>);

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.string(self)
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        _serializer: SerializerSwitch,
    ) -> Result<()> {
        *self = dec.string()?;
        Ok(())
    }

    fn size_value(&self, _packed: bool, _serializer: SerializerSwitch) -> Option<usize> {
        Some(uvarint_size(self.len() as u64) + self.len())
    }
}

// --- SEQUENCES ---

impl<T: Serializable + Default> Serializable for Vec<T> {
    const DESC: &'static TypeDesc = &TypeDesc::new(
        Kind::Slice(<T as Serializable>::desc),
        TypeId::of::<Vec<T>>,
        type_name::<Vec<T>>,
    );

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.uvarint(self.len() as u64)?;
        if T::DESC.kind().is_bool() {
            return enc.bool_bits(self.len(), self.iter().map(|b| b.get_bool().unwrap_or(false)));
        }
        let sub = serializer.sub_switch_check(T::DESC);
        for item in self {
            enc.write_value(item, false, sub)?;
        }
        Ok(())
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        let len = dec.read_len()?;
        self.clear();
        if T::DESC.kind().is_bool() {
            for bit in dec.bool_bits(len)? {
                let mut item = T::default();
                item.set_bool(bit);
                self.push(item);
            }
            return Ok(());
        }
        let sub = serializer.sub_switch_check(T::DESC);
        for _ in 0..len {
            let mut item = T::default();
            dec.read_value(&mut item, false, sub)?;
            self.push(item);
        }
        Ok(())
    }

    fn size_value(&self, _packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        let mut total = uvarint_size(self.len() as u64);
        if T::DESC.kind().is_bool() {
            return Some(total + size::bool_array_size(self.len()));
        }
        let sub = serializer.sub_switch_check(T::DESC);
        for item in self {
            total += size::value_size(item, false, sub)?;
        }
        Some(total)
    }
}

fn encode_array_body<T: Serializable>(
    items: &[T],
    enc: &mut Encoder<'_>,
    serializer: SerializerSwitch,
) -> Result<()> {
    if T::DESC.kind().is_bool() {
        return enc.bool_bits(items.len(), items.iter().map(|b| b.get_bool().unwrap_or(false)));
    }
    let sub = serializer.sub_switch_check(T::DESC);
    for item in items {
        enc.write_value(item, false, sub)?;
    }
    Ok(())
}

fn decode_array_body<T: Serializable>(
    items: &mut [T],
    dec: &mut Decoder<'_>,
    serializer: SerializerSwitch,
) -> Result<()> {
    if T::DESC.kind().is_bool() {
        let bits = dec.bool_bits(items.len())?;
        for (item, bit) in items.iter_mut().zip(bits) {
            item.set_bool(bit);
        }
        return Ok(());
    }
    let sub = serializer.sub_switch_check(T::DESC);
    for item in items {
        dec.read_value(item, false, sub)?;
    }
    Ok(())
}

fn size_array_body<T: Serializable>(items: &[T], serializer: SerializerSwitch) -> Option<usize> {
    if T::DESC.kind().is_bool() {
        return Some(size::bool_array_size(items.len()));
    }
    let sub = serializer.sub_switch_check(T::DESC);
    let mut total = 0;
    for item in items {
        total += size::value_size(item, false, sub)?;
    }
    Some(total)
}

impl<T: Serializable, const N: usize> Serializable for [T; N] {
    const DESC: &'static TypeDesc = &TypeDesc::new(
        Kind::Array(N, <T as Serializable>::desc),
        TypeId::of::<[T; N]>,
        type_name::<[T; N]>,
    );

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.uvarint(N as u64)?;
        encode_array_body(self, enc, serializer)
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        let found = dec.read_len()?;
        if found != N {
            return Err(TinybinError::LengthMismatch {
                expected: N,
                found,
            });
        }
        decode_array_body(self, dec, serializer)
    }

    fn size_value(&self, _packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        Some(uvarint_size(N as u64) + size_array_body(self, serializer)?)
    }

    // Fixed bool arrays elide the length prefix in struct-field position:
    // the length is statically known from the cached field type.

    fn encode_field(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if T::DESC.kind().is_bool() {
            return encode_array_body(self, enc, serializer);
        }
        self.encode_value(enc, packed, serializer)
    }

    fn decode_field(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if T::DESC.kind().is_bool() {
            return decode_array_body(self, dec, serializer);
        }
        self.decode_value(dec, packed, serializer)
    }

    fn size_field(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        if T::DESC.kind().is_bool() {
            return size_array_body(self, serializer);
        }
        self.size_value(packed, serializer)
    }
}

// --- MAPPINGS ---
//
// Entries go out in whatever order the mapping iterates; the decoder
// rebuilds with its own ordering, which is fine because entry order does
// not affect equality.

impl<K, V, S> Serializable for HashMap<K, V, S>
where
    K: Serializable + Eq + Hash + Default,
    V: Serializable + Default,
    S: BuildHasher + Default + 'static,
{
    const DESC: &'static TypeDesc = &TypeDesc::new(
        Kind::Map(<K as Serializable>::desc, <V as Serializable>::desc),
        TypeId::of::<Self>,
        type_name::<Self>,
    );

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.uvarint(self.len() as u64)?;
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for (k, v) in self {
            enc.write_value(k, false, key_sub)?;
            enc.write_value(v, false, val_sub)?;
        }
        Ok(())
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        let count = dec.read_len()?;
        self.clear();
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for _ in 0..count {
            let mut k = K::default();
            let mut v = V::default();
            dec.read_value(&mut k, false, key_sub)?;
            dec.read_value(&mut v, false, val_sub)?;
            self.insert(k, v);
        }
        Ok(())
    }

    fn size_value(&self, _packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        let mut total = uvarint_size(self.len() as u64);
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for (k, v) in self {
            total += size::value_size(k, false, key_sub)?;
            total += size::value_size(v, false, val_sub)?;
        }
        Some(total)
    }
}

impl<K, V> Serializable for BTreeMap<K, V>
where
    K: Serializable + Ord + Default,
    V: Serializable + Default,
{
    const DESC: &'static TypeDesc = &TypeDesc::new(
        Kind::Map(<K as Serializable>::desc, <V as Serializable>::desc),
        TypeId::of::<Self>,
        type_name::<Self>,
    );

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        enc.uvarint(self.len() as u64)?;
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for (k, v) in self {
            enc.write_value(k, false, key_sub)?;
            enc.write_value(v, false, val_sub)?;
        }
        Ok(())
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        _packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        let count = dec.read_len()?;
        self.clear();
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for _ in 0..count {
            let mut k = K::default();
            let mut v = V::default();
            dec.read_value(&mut k, false, key_sub)?;
            dec.read_value(&mut v, false, val_sub)?;
            self.insert(k, v);
        }
        Ok(())
    }

    fn size_value(&self, _packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        let mut total = uvarint_size(self.len() as u64);
        let key_sub = serializer.sub_switch_check(K::DESC);
        let val_sub = serializer.sub_switch_check(V::DESC);
        for (k, v) in self {
            total += size::value_size(k, false, key_sub)?;
            total += size::value_size(v, false, val_sub)?;
        }
        Some(total)
    }
}

// --- POINTERS ---

impl<T: Serializable + Default> Serializable for Option<T> {
    const DESC: &'static TypeDesc = &TypeDesc::new(
        Kind::Ptr(<T as Serializable>::desc),
        TypeId::of::<Option<T>>,
        type_name::<Option<T>>,
    );

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if T::DESC.is_ptr() {
            return Err(TinybinError::UnsupportedKind(type_name::<Self>()));
        }
        match self {
            Some(v) => {
                enc.bool(true)?;
                enc.write_value(v, packed, serializer)
            }
            None => enc.bool(false),
        }
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if T::DESC.is_ptr() {
            return Err(TinybinError::UnsupportedKind(type_name::<Self>()));
        }
        if dec.bool()? {
            // Allocate the pointee before recursing into it.
            if self.is_none() {
                *self = Some(T::default());
            }
            if let Some(v) = self.as_mut() {
                dec.read_value(v, packed, serializer)?;
            }
            Ok(())
        } else {
            *self = None;
            Ok(())
        }
    }

    fn size_value(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        if T::DESC.is_ptr() {
            return None;
        }
        match self {
            Some(v) => Some(1 + size::value_size(v, packed, serializer)?),
            None => Some(1),
        }
    }
}

impl<T: Serializable> Serializable for Box<T> {
    // Plain heap indirection, not optionality: a box encodes exactly as its
    // pointee, so `Option<Box<T>>` stays a single pointer level.
    const DESC: &'static TypeDesc = T::DESC;

    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        (**self).encode_value(enc, packed, serializer)
    }

    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        (**self).decode_value(dec, packed, serializer)
    }

    fn size_value(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        (**self).size_value(packed, serializer)
    }

    fn encode_field(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        (**self).encode_field(enc, packed, serializer)
    }

    fn decode_field(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        (**self).decode_field(dec, packed, serializer)
    }

    fn size_field(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        (**self).size_field(packed, serializer)
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }

    fn get_bool(&self) -> Option<bool> {
        (**self).get_bool()
    }

    fn set_bool(&mut self, v: bool) {
        (**self).set_bool(v);
    }
}
