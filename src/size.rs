//! The size-measurement pass: a mechanical mirror of encode that counts
//! bytes instead of writing them.
//!
//! [`size_of`] returns `None` when the traversal reaches an unsupported
//! kind (the sentinel the high-level [`encode`](crate::encode) entrypoint
//! translates into
//! [`UnsupportedKind`](crate::TinybinError::UnsupportedKind)); otherwise it
//! is exact: `encode(v).len() == size_of(v)`.

use crate::registry::{self, SerializerSwitch};
use crate::serial::Serializable;

/// Number of bytes `n` bit-packed booleans occupy, excluding any length
/// prefix.
pub fn bool_array_size(n: usize) -> usize {
    n.div_ceil(8)
}

/// Exact encoded byte length of `x`, or `None` if `x` contains an
/// unsupported kind.
pub fn size_of<T: Serializable>(x: &T) -> Option<usize> {
    size_of_with(x, true)
}

/// Like [`size_of`], choosing whether registered custom serializers take
/// over; pair it with the matching
/// [`value_with`](crate::Encoder::value_with) call.
pub fn size_of_with<T: Serializable>(x: &T, enable_serializer: bool) -> Option<usize> {
    value_size(x, false, SerializerSwitch::top_level(enable_serializer))
}

/// Measurement driver for value position: resolves serializer delegation,
/// then descends structurally.
pub(crate) fn value_size<T: Serializable>(
    x: &T,
    packed: bool,
    serializer: SerializerSwitch,
) -> Option<usize> {
    if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
        return (vt.size)(x.as_any()).ok();
    }
    x.size_value(packed, serializer)
}

/// Measurement driver for struct-field position.
pub(crate) fn field_size<T: Serializable>(
    x: &T,
    packed: bool,
    serializer: SerializerSwitch,
) -> Option<usize> {
    if let Some(vt) = registry::delegate_for(T::DESC, serializer) {
        return (vt.size)(x.as_any()).ok();
    }
    x.size_field(packed, serializer)
}
