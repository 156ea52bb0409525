//! The decoding engine.
//!
//! [`Decoder`] borrows the input bytes read-only and mirrors
//! [`Encoder`](crate::Encoder) exactly: typed fast-path methods, a generic
//! [`value`](Decoder::value) traversal, and a [`skip`](Decoder::skip)
//! traversal that consumes a value's bytes without storing them. Running
//! out of input mid-value fails with
//! [`ShortRead`](crate::TinybinError::ShortRead); trailing unread bytes are
//! not an error.

use num_complex::Complex;

use crate::desc::{Kind, TypeDesc};
use crate::endian::{Endian, DEFAULT_ENDIAN};
use crate::error::{Result, TinybinError};
use crate::registry::{self, SerializerSwitch};
use crate::serial::Serializable;
use crate::size;
use crate::varint::{from_zigzag, MAX_VARINT_LEN};

/// Decodes values from a borrowed byte slice.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> Decoder<'a> {
    /// Wraps `data` with the default byte order.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, DEFAULT_ENDIAN)
    }

    /// Wraps `data` with an explicit byte order for fixed-width primitives.
    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self {
            buf: data,
            pos: 0,
            endian,
        }
    }

    /// Number of bytes consumed so far.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total length of the input.
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consumes the next `size` bytes.
    fn reserve(&mut self, size: usize) -> Result<&'a [u8]> {
        let new_pos = self.pos.checked_add(size).unwrap_or(usize::MAX);
        if new_pos > self.buf.len() {
            return Err(TinybinError::ShortRead {
                pos: self.pos,
                len: self.buf.len(),
                need: size,
            });
        }
        let region = &self.buf[self.pos..new_pos];
        self.pos = new_pos;
        Ok(region)
    }

    // --- FAST PATH: BUILT-IN PRIMITIVES ---

    /// Decodes a bool; any non-zero byte reads as `true`.
    pub fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    /// Decodes a raw byte.
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.reserve(1)?[0])
    }

    /// Decodes an `i8`.
    pub fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }

    /// Decodes a `u16` in the configured byte order.
    pub fn u16(&mut self) -> Result<u16> {
        let endian = self.endian;
        Ok(endian.get_u16(self.reserve(2)?))
    }

    /// Decodes an `i16`.
    pub fn i16(&mut self) -> Result<i16> {
        Ok(self.u16()? as i16)
    }

    /// Decodes a `u32` in the configured byte order.
    pub fn u32(&mut self) -> Result<u32> {
        let endian = self.endian;
        Ok(endian.get_u32(self.reserve(4)?))
    }

    /// Decodes an `i32`.
    pub fn i32(&mut self) -> Result<i32> {
        Ok(self.u32()? as i32)
    }

    /// Decodes a `u64` in the configured byte order.
    pub fn u64(&mut self) -> Result<u64> {
        let endian = self.endian;
        Ok(endian.get_u64(self.reserve(8)?))
    }

    /// Decodes an `i64`.
    pub fn i64(&mut self) -> Result<i64> {
        Ok(self.u64()? as i64)
    }

    /// Decodes an `f32` from its IEEE-754 bit pattern.
    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    /// Decodes an `f64` from its IEEE-754 bit pattern.
    pub fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.u64()?))
    }

    /// Decodes a complex64: real then imaginary part.
    pub fn complex64(&mut self) -> Result<Complex<f32>> {
        let re = self.f32()?;
        let im = self.f32()?;
        Ok(Complex::new(re, im))
    }

    /// Decodes a complex128: real then imaginary part.
    pub fn complex128(&mut self) -> Result<Complex<f64>> {
        let re = self.f64()?;
        let im = self.f64()?;
        Ok(Complex::new(re, im))
    }

    /// Decodes an architecture-width signed integer from a zig-zag varint.
    pub fn int(&mut self) -> Result<isize> {
        Ok(self.varint()? as isize)
    }

    /// Decodes an architecture-width unsigned integer from a varint.
    pub fn uint(&mut self) -> Result<usize> {
        Ok(self.uvarint()? as usize)
    }

    /// Decodes a length-prefixed UTF-8 string.
    pub fn string(&mut self) -> Result<String> {
        let bytes = self.bytes()?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    /// Decodes a length-prefixed byte slice, borrowed from the input.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.reserve(len)
    }

    /// Decodes a zig-zag varint into an `i64`.
    pub fn varint(&mut self) -> Result<i64> {
        Ok(from_zigzag(self.uvarint()?))
    }

    /// Decodes a base-128 varint into a `u64`.
    ///
    /// Fails with [`MalformedVarint`](TinybinError::MalformedVarint) if the
    /// continuation chain runs past 10 bytes or the tenth byte overflows 64
    /// bits.
    pub fn uvarint(&mut self) -> Result<u64> {
        let mut x: u64 = 0;
        let mut shift: u32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let b = self.u8()?;
            if b < 0x80 {
                if i == MAX_VARINT_LEN - 1 && b > 1 {
                    return Err(TinybinError::MalformedVarint);
                }
                return Ok(x | (u64::from(b) << shift));
            }
            x |= u64::from(b & 0x7F) << shift;
            shift += 7;
        }
        Err(TinybinError::MalformedVarint)
    }

    /// Reads a varint length prefix as a `usize`.
    pub(crate) fn read_len(&mut self) -> Result<usize> {
        let n = self.uvarint()?;
        Ok(usize::try_from(n).unwrap_or(usize::MAX))
    }

    // --- GENERIC TRAVERSAL ---

    /// Decodes into any serializable target, with custom serializers
    /// enabled.
    pub fn value<T: Serializable>(&mut self, x: &mut T) -> Result<()> {
        self.value_with(x, true)
    }

    /// Decodes into any serializable target, choosing whether registered
    /// custom serializers may take over.
    pub fn value_with<T: Serializable>(&mut self, x: &mut T, enable_serializer: bool) -> Result<()> {
        self.read_value(x, false, SerializerSwitch::top_level(enable_serializer))
    }

    /// Consumes the bytes of one `T` value without storing it, returning
    /// the number of bytes skipped.
    pub fn skip<T: Serializable>(&mut self) -> Result<usize> {
        self.skip_desc(T::DESC, false, SerializerSwitch::top_level(true), false)
    }

    /// Traversal driver for value position.
    pub(crate) fn read_value<T: Serializable>(
        &mut self,
        x: &mut T,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
            return (vt.decode)(x.as_any_mut(), self);
        }
        x.decode_value(self, packed, serializer)
    }

    /// Traversal driver for struct-field position.
    pub(crate) fn read_field<T: Serializable>(
        &mut self,
        x: &mut T,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
            return (vt.decode)(x.as_any_mut(), self);
        }
        x.decode_field(self, packed, serializer)
    }

    /// Unpacks `count` booleans written by the encoder's bit packer.
    /// Unused high bits of the final byte are ignored.
    pub(crate) fn bool_bits(&mut self, count: usize) -> Result<impl Iterator<Item = bool> + 'a> {
        let bytes = self.reserve(size::bool_array_size(count))?;
        Ok((0..count).map(move |i| bytes[i / 8] >> (i % 8) & 1 == 1))
    }

    /// Descriptor-driven skip: the mechanical mirror of decode that stores
    /// nothing. Follows cached struct layouts, bool packing, pointer
    /// presence and serializer delegation.
    pub(crate) fn skip_desc(
        &mut self,
        desc: &'static TypeDesc,
        packed: bool,
        serializer: SerializerSwitch,
        field_pos: bool,
    ) -> Result<usize> {
        if let Some(vt) = registry::delegate_for(desc, serializer) {
            return (vt.skip)(self);
        }
        let start = self.pos;
        match desc.kind() {
            Kind::Bool => {
                self.reserve(1)?;
            }
            Kind::I8 | Kind::U8 | Kind::I16 | Kind::U16 | Kind::I32 | Kind::U32 | Kind::I64
            | Kind::U64 => {
                if packed {
                    self.uvarint()?;
                } else {
                    // Fixed widths 1/2/4/8 from the descriptor.
                    let width = desc
                        .fixed_size()
                        .ok_or_else(|| internal_desc(desc, "fixed integer without a width"))?;
                    self.reserve(width)?;
                }
            }
            Kind::Int | Kind::Uint => {
                self.uvarint()?;
            }
            Kind::F32 => {
                self.reserve(4)?;
            }
            Kind::F64 | Kind::Complex64 => {
                self.reserve(8)?;
            }
            Kind::Complex128 => {
                self.reserve(16)?;
            }
            Kind::Str => {
                let len = self.read_len()?;
                self.reserve(len)?;
            }
            Kind::Slice(elem) => {
                let elem = elem();
                let len = self.read_len()?;
                if elem.kind().is_bool() {
                    self.reserve(size::bool_array_size(len))?;
                } else {
                    let sub = serializer.sub_switch_check(elem);
                    for _ in 0..len {
                        self.skip_desc(elem, false, sub, false)?;
                    }
                }
            }
            Kind::Array(n, elem) => {
                let elem = elem();
                if elem.kind().is_bool() {
                    if !field_pos {
                        let found = self.read_len()?;
                        if found != n {
                            return Err(TinybinError::LengthMismatch {
                                expected: n,
                                found,
                            });
                        }
                    }
                    self.reserve(size::bool_array_size(n))?;
                } else {
                    let found = self.read_len()?;
                    if found != n {
                        return Err(TinybinError::LengthMismatch {
                            expected: n,
                            found,
                        });
                    }
                    let sub = serializer.sub_switch_check(elem);
                    for _ in 0..n {
                        self.skip_desc(elem, false, sub, false)?;
                    }
                }
            }
            Kind::Map(key, val) => {
                let (key, val) = (key(), val());
                let count = self.read_len()?;
                let key_sub = serializer.sub_switch_check(key);
                let val_sub = serializer.sub_switch_check(val);
                for _ in 0..count {
                    self.skip_desc(key, false, key_sub, false)?;
                    self.skip_desc(val, false, val_sub, false)?;
                }
            }
            Kind::Struct(sd) => {
                let info = registry::query_struct(desc.type_id());
                for (i, f) in sd.fields.iter().enumerate() {
                    let cached = info.and_then(|s| s.field(i));
                    if cached.map_or(f.ignore, |c| c.is_ignored()) {
                        continue;
                    }
                    let fpacked = cached.is_some_and(|c| c.is_packed());
                    let sub = serializer.sub_switch(cached.is_some_and(|c| c.is_serializer()));
                    self.skip_desc((f.desc)(), fpacked, sub, true)?;
                }
            }
            Kind::Ptr(pointee) => {
                let pointee = pointee();
                if pointee.is_ptr() {
                    return Err(TinybinError::UnsupportedKind(desc.type_name()));
                }
                if self.bool()? {
                    self.skip_desc(pointee, packed, serializer, false)?;
                }
            }
        }
        Ok(self.pos - start)
    }
}

fn internal_desc(desc: &TypeDesc, what: &str) -> TinybinError {
    TinybinError::Internal(format!("{what} (type {})", desc.type_name()))
}
