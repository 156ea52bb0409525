//! The encoding engine.
//!
//! [`Encoder`] wraps a caller-supplied byte region with a write cursor and
//! exposes two surfaces: typed fast-path methods for built-in primitives
//! (no dispatch of any kind), and the generic [`value`](Encoder::value)
//! traversal that walks any [`Serializable`] shape, consulting the registry
//! for custom-serializer delegation.

use num_complex::Complex;

use crate::coder::Coder;
use crate::endian::{Endian, DEFAULT_ENDIAN};
use crate::error::Result;
use crate::registry::{self, SerializerSwitch};
use crate::serial::Serializable;
use crate::size;
use crate::varint::to_zigzag;

/// Encodes values into a fixed byte region.
///
/// The region never grows; encoding past its capacity fails with
/// [`NotEnoughSpace`](crate::TinybinError::NotEnoughSpace). Size the region
/// with [`size_of`](crate::size_of) or use [`encode`](crate::encode), which
/// does the measurement pass for you.
#[derive(Debug)]
pub struct Encoder<'a> {
    c: Coder<'a>,
}

impl<'a> Encoder<'a> {
    /// Wraps `buf` with the default byte order.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self::with_endian(buf, DEFAULT_ENDIAN)
    }

    /// Wraps `buf` with an explicit byte order for fixed-width primitives.
    pub fn with_endian(buf: &'a mut [u8], endian: Endian) -> Self {
        Self {
            c: Coder::new(buf, endian),
        }
    }

    /// Number of bytes encoded so far.
    pub fn len(&self) -> usize {
        self.c.len()
    }

    /// True if nothing has been encoded yet.
    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    /// Total capacity of the output region.
    pub fn cap(&self) -> usize {
        self.c.cap()
    }

    /// The bytes encoded so far.
    pub fn buffer(&self) -> &[u8] {
        self.c.buffer()
    }

    /// Zero-fills and skips `size` output bytes.
    pub fn skip(&mut self, size: usize) -> Result<usize> {
        self.c.skip(size)
    }

    /// Rewinds to the start of the region, zero-filling everything written.
    pub fn reset(&mut self) {
        self.c.reset();
    }

    // --- FAST PATH: BUILT-IN PRIMITIVES ---

    /// Encodes a bool as one byte, `0x00` or `0x01`.
    pub fn bool(&mut self, x: bool) -> Result<()> {
        self.u8(u8::from(x))
    }

    /// Encodes a raw byte.
    pub fn u8(&mut self, x: u8) -> Result<()> {
        let b = self.c.reserve(1)?;
        b[0] = x;
        Ok(())
    }

    /// Encodes an `i8` as one raw byte.
    pub fn i8(&mut self, x: i8) -> Result<()> {
        self.u8(x as u8)
    }

    /// Encodes a `u16` in the configured byte order.
    pub fn u16(&mut self, x: u16) -> Result<()> {
        let endian = self.c.endian();
        let b = self.c.reserve(2)?;
        endian.put_u16(b, x);
        Ok(())
    }

    /// Encodes an `i16` in the configured byte order.
    pub fn i16(&mut self, x: i16) -> Result<()> {
        self.u16(x as u16)
    }

    /// Encodes a `u32` in the configured byte order.
    pub fn u32(&mut self, x: u32) -> Result<()> {
        let endian = self.c.endian();
        let b = self.c.reserve(4)?;
        endian.put_u32(b, x);
        Ok(())
    }

    /// Encodes an `i32` in the configured byte order.
    pub fn i32(&mut self, x: i32) -> Result<()> {
        self.u32(x as u32)
    }

    /// Encodes a `u64` in the configured byte order.
    pub fn u64(&mut self, x: u64) -> Result<()> {
        let endian = self.c.endian();
        let b = self.c.reserve(8)?;
        endian.put_u64(b, x);
        Ok(())
    }

    /// Encodes an `i64` in the configured byte order.
    pub fn i64(&mut self, x: i64) -> Result<()> {
        self.u64(x as u64)
    }

    /// Encodes an `f32` as its IEEE-754 bit pattern.
    pub fn f32(&mut self, x: f32) -> Result<()> {
        self.u32(x.to_bits())
    }

    /// Encodes an `f64` as its IEEE-754 bit pattern.
    pub fn f64(&mut self, x: f64) -> Result<()> {
        self.u64(x.to_bits())
    }

    /// Encodes a complex64: real then imaginary part, each as an `f32`.
    pub fn complex64(&mut self, x: Complex<f32>) -> Result<()> {
        self.f32(x.re)?;
        self.f32(x.im)
    }

    /// Encodes a complex128: real then imaginary part, each as an `f64`.
    pub fn complex128(&mut self, x: Complex<f64>) -> Result<()> {
        self.f64(x.re)?;
        self.f64(x.im)
    }

    /// Encodes an architecture-width signed integer as a zig-zag varint.
    pub fn int(&mut self, x: isize) -> Result<usize> {
        self.varint(x as i64)
    }

    /// Encodes an architecture-width unsigned integer as a varint.
    pub fn uint(&mut self, x: usize) -> Result<usize> {
        self.uvarint(x as u64)
    }

    /// Encodes a string: varint byte length, then UTF-8 bytes, no
    /// terminator.
    pub fn string(&mut self, x: &str) -> Result<()> {
        self.bytes(x.as_bytes())
    }

    /// Encodes a byte slice: varint length, then the raw bytes.
    pub fn bytes(&mut self, x: &[u8]) -> Result<()> {
        self.uvarint(x.len() as u64)?;
        let b = self.c.reserve(x.len())?;
        b.copy_from_slice(x);
        Ok(())
    }

    /// Encodes an `i64` as a zig-zag varint, returning the byte count
    /// (1 to 10).
    pub fn varint(&mut self, x: i64) -> Result<usize> {
        self.uvarint(to_zigzag(x))
    }

    /// Encodes a `u64` as a base-128 varint, returning the byte count
    /// (1 to 10).
    pub fn uvarint(&mut self, x: u64) -> Result<usize> {
        let mut rest = x;
        let mut n = 1;
        while rest >= 0x80 {
            self.u8(rest as u8 | 0x80)?;
            rest >>= 7;
            n += 1;
        }
        self.u8(rest as u8)?;
        Ok(n)
    }

    // --- GENERIC TRAVERSAL ---

    /// Encodes any serializable value, with custom serializers enabled.
    pub fn value<T: Serializable>(&mut self, x: &T) -> Result<()> {
        self.value_with(x, true)
    }

    /// Encodes any serializable value, choosing whether registered custom
    /// serializers may take over.
    pub fn value_with<T: Serializable>(&mut self, x: &T, enable_serializer: bool) -> Result<()> {
        self.write_value(x, false, SerializerSwitch::top_level(enable_serializer))
    }

    /// Traversal driver for value position: resolves serializer delegation,
    /// then descends structurally.
    pub(crate) fn write_value<T: Serializable>(
        &mut self,
        x: &T,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
            return (vt.encode)(x.as_any(), self);
        }
        x.encode_value(self, packed, serializer)
    }

    /// Traversal driver for struct-field position.
    pub(crate) fn write_field<T: Serializable>(
        &mut self,
        x: &T,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
            return (vt.encode)(x.as_any(), self);
        }
        x.encode_field(self, packed, serializer)
    }

    /// Packs `count` booleans into `⌈count/8⌉` bytes, bit `i % 8` of byte
    /// `i / 8`, least significant bit first. Unused high bits of the final
    /// byte are zero.
    pub(crate) fn bool_bits<I>(&mut self, count: usize, bits: I) -> Result<()>
    where
        I: IntoIterator<Item = bool>,
    {
        let region = self.c.reserve(size::bool_array_size(count))?;
        region.fill(0);
        for (i, bit) in bits.into_iter().take(count).enumerate() {
            if bit {
                region[i / 8] |= 1 << (i % 8);
            }
        }
        Ok(())
    }
}
