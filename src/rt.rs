//! Runtime utilities used by the derived code (Macros).
//! Do not use directly.

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::registry::{self, SerializerSwitch, StructInfo};
use crate::serial::Serializable;
use crate::size;

/// Cached metadata for `T`, if `T` has been registered.
pub fn struct_info<T: Serializable>() -> Option<&'static StructInfo> {
    registry::struct_info::<T>()
}

/// Packed flag for field `i`: honored only when the struct is registered.
pub fn field_packed(info: Option<&'static StructInfo>, i: usize) -> bool {
    info.and_then(|s| s.field(i)).is_some_and(|f| f.is_packed())
}

/// Serializer switch for field `i`, narrowed from the parent's switch and
/// the cached serializer flag (`CheckFalse` when the struct is not
/// registered).
pub fn field_switch(
    info: Option<&'static StructInfo>,
    i: usize,
    parent: SerializerSwitch,
) -> SerializerSwitch {
    parent.sub_switch(
        info.and_then(|s| s.field(i))
            .is_some_and(|f| f.is_serializer()),
    )
}

/// Encodes one struct field through the engine's field-position driver.
pub fn encode_field<T: Serializable>(
    enc: &mut Encoder<'_>,
    x: &T,
    packed: bool,
    serializer: SerializerSwitch,
) -> Result<()> {
    enc.write_field(x, packed, serializer)
}

/// Decodes one struct field through the engine's field-position driver.
pub fn decode_field<T: Serializable>(
    dec: &mut Decoder<'_>,
    x: &mut T,
    packed: bool,
    serializer: SerializerSwitch,
) -> Result<()> {
    dec.read_field(x, packed, serializer)
}

/// Measures one struct field through the engine's field-position driver.
pub fn size_field<T: Serializable>(
    x: &T,
    packed: bool,
    serializer: SerializerSwitch,
) -> Option<usize> {
    size::field_size(x, packed, serializer)
}
