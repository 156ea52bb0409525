//! The `Serializable` trait: the seam between the traversal engine and the
//! types it walks.
//!
//! Implementations exist for every kind in the supported set (see
//! [`desc`](crate::desc)); structs get theirs from
//! `#[derive(TinybinObject)]`. The engine calls the `*_value` hooks for
//! values in sequence/map/top-level position and the `*_field` hooks for
//! struct-field position; the two differ only for fixed bool arrays, which
//! elide their length prefix inside structs.

use std::any::Any;

use crate::decoder::Decoder;
use crate::desc::TypeDesc;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::registry::SerializerSwitch;

/// A type the traversal engine can encode, decode, size and skip.
///
/// The `packed` flag requests varint encoding and is honored only by
/// integer kinds; the [`SerializerSwitch`] tells the engine's driver
/// (not the implementation itself) whether to delegate to a registered
/// custom serializer before these hooks are ever reached.
pub trait Serializable: Any + Sized {
    /// Static descriptor of this type's wire shape.
    const DESC: &'static TypeDesc;

    /// Thunk form of [`DESC`](Self::DESC), usable as a
    /// [`DescFn`](crate::desc::DescFn).
    fn desc() -> &'static TypeDesc {
        Self::DESC
    }

    /// Writes `self` in value position.
    fn encode_value(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()>;

    /// Reads `self` in value position, replacing its contents.
    fn decode_value(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()>;

    /// Encoded byte length of `self` in value position; `None` if an
    /// unsupported kind is reachable from here.
    fn size_value(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize>;

    /// Writes `self` in struct-field position. Identical to
    /// [`encode_value`](Self::encode_value) except for fixed bool arrays.
    fn encode_field(
        &self,
        enc: &mut Encoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        self.encode_value(enc, packed, serializer)
    }

    /// Reads `self` in struct-field position.
    fn decode_field(
        &mut self,
        dec: &mut Decoder<'_>,
        packed: bool,
        serializer: SerializerSwitch,
    ) -> Result<()> {
        self.decode_value(dec, packed, serializer)
    }

    /// Encoded byte length of `self` in struct-field position.
    fn size_field(&self, packed: bool, serializer: SerializerSwitch) -> Option<usize> {
        self.size_value(packed, serializer)
    }

    /// View for erased serializer dispatch. `Box<T>` forwards to its
    /// pointee so vtables always see the registered type.
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Mutable counterpart of [`as_any`](Self::as_any).
    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    /// Bit-packing accessor; only the bool impl returns a value.
    #[doc(hidden)]
    fn get_bool(&self) -> Option<bool> {
        None
    }

    /// Bit-packing mutator; only the bool impl stores the value.
    #[doc(hidden)]
    fn set_bool(&mut self, _v: bool) {}
}
