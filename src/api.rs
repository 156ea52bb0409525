//! High-level entrypoints.

use std::any::type_name;

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Result, TinybinError};
use crate::serial::Serializable;
use crate::size;

/// Encodes `x` into a freshly allocated buffer sized by a prior
/// measurement pass.
///
/// The buffer is exactly as long as the encoding; on error it is dropped.
pub fn encode<T: Serializable>(x: &T) -> Result<Vec<u8>> {
    let len = size::size_of(x).ok_or(TinybinError::UnsupportedKind(type_name::<T>()))?;
    let mut buf = vec![0u8; len];
    let mut enc = Encoder::new(&mut buf);
    enc.value(x)?;
    let written = enc.len();
    buf.truncate(written);
    Ok(buf)
}

/// Encodes `x` into a caller-provided buffer, returning the number of
/// bytes written. Fails with
/// [`NotEnoughSpace`](TinybinError::NotEnoughSpace) if the buffer is too
/// small.
pub fn encode_into<T: Serializable>(x: &T, buf: &mut [u8]) -> Result<usize> {
    let mut enc = Encoder::new(buf);
    enc.value(x)?;
    Ok(enc.len())
}

/// Decodes `bytes` into `x`, which must already be a value of the expected
/// schema.
///
/// Trailing unread bytes are not an error; exhausting the input mid-value
/// is [`ShortRead`](TinybinError::ShortRead).
pub fn decode<T: Serializable>(bytes: &[u8], x: &mut T) -> Result<()> {
    Decoder::new(bytes).value(x)
}

/// Decodes `bytes` into a default-constructed `T`.
pub fn decode_new<T: Serializable + Default>(bytes: &[u8]) -> Result<T> {
    let mut x = T::default();
    decode(bytes, &mut x)?;
    Ok(x)
}

/// Exact encoded byte length of `x`, or `None` if `x` contains an
/// unsupported kind.
pub fn size_of<T: Serializable>(x: &T) -> Option<usize> {
    size::size_of(x)
}
