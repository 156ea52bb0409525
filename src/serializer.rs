//! The custom-serializer capability set.
//!
//! A user-defined type takes over its own wire format by implementing the
//! size/encode/decode triad and registering through
//! [`register_serializer`](crate::register_serializer). The traversal then
//! delegates to the type instead of walking its structure, guided by the
//! [`SerializerSwitch`](crate::SerializerSwitch) it propagates.
//!
//! The measurement and encode operations take `&self` (callable on a
//! non-owning view); decode takes `&mut self` because it mutates the
//! target. A partial triad does not satisfy the
//! [`BinarySerializer`] bound and fails at compile time: the static
//! rendering of the `IncompleteSerializer` / `DecodeMustMutate`
//! registration errors.

use std::any::Any;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Result, TinybinError};

/// Measurement half of the capability set: the exact number of bytes
/// [`BinaryEncoder::encode_to`] will write.
pub trait BinarySizer {
    /// Returns the encoded byte length of `self`.
    fn size_in_bytes(&self) -> usize;
}

/// Encoding half of the capability set.
pub trait BinaryEncoder {
    /// Writes `self` to the encoder.
    fn encode_to(&self, enc: &mut Encoder<'_>) -> Result<()>;
}

/// Decoding half of the capability set. Mutates the target in place.
pub trait BinaryDecoder {
    /// Reads `self`'s wire form from the decoder, replacing its contents.
    fn decode_from(&mut self, dec: &mut Decoder<'_>) -> Result<()>;
}

/// The full capability triad. Blanket-implemented for any type providing
/// all three halves.
pub trait BinarySerializer: BinarySizer + BinaryEncoder + BinaryDecoder {}

impl<T: BinarySizer + BinaryEncoder + BinaryDecoder> BinarySerializer for T {}

/// Erased entry points for one registered serializer type, keyed by
/// `TypeId` in the registry. Built once at registration and leaked to
/// `&'static`.
#[derive(Debug)]
pub struct SerializerVtable {
    pub(crate) size: fn(&dyn Any) -> Result<usize>,
    pub(crate) encode: fn(&dyn Any, &mut Encoder<'_>) -> Result<()>,
    pub(crate) decode: fn(&mut dyn Any, &mut Decoder<'_>) -> Result<()>,
    pub(crate) skip: fn(&mut Decoder<'_>) -> Result<usize>,
}

pub(crate) fn vtable_of<T>() -> &'static SerializerVtable
where
    T: BinarySerializer + Default + 'static,
{
    Box::leak(Box::new(SerializerVtable {
        size: erased_size::<T>,
        encode: erased_encode::<T>,
        decode: erased_decode::<T>,
        skip: erased_skip::<T>,
    }))
}

fn mismatch<T>() -> TinybinError {
    TinybinError::Internal(format!(
        "serializer vtable for {} received a value of another type",
        std::any::type_name::<T>()
    ))
}

fn erased_size<T: BinarySizer + 'static>(x: &dyn Any) -> Result<usize> {
    let v = x.downcast_ref::<T>().ok_or_else(mismatch::<T>)?;
    Ok(v.size_in_bytes())
}

fn erased_encode<T: BinaryEncoder + 'static>(x: &dyn Any, enc: &mut Encoder<'_>) -> Result<()> {
    let v = x.downcast_ref::<T>().ok_or_else(mismatch::<T>)?;
    v.encode_to(enc)
}

fn erased_decode<T: BinaryDecoder + 'static>(x: &mut dyn Any, dec: &mut Decoder<'_>) -> Result<()> {
    let v = x.downcast_mut::<T>().ok_or_else(mismatch::<T>)?;
    v.decode_from(dec)
}

fn erased_skip<T: BinaryDecoder + Default + 'static>(dec: &mut Decoder<'_>) -> Result<usize> {
    let start = dec.pos();
    let mut scratch = T::default();
    scratch.decode_from(dec)?;
    Ok(dec.pos() - start)
}
