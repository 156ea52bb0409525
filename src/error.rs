//! Centralized error handling for tinybin.
//!
//! All failure conditions are represented as `Result` values; the library
//! enforces this through `#![deny(clippy::panic)]` and
//! `#![deny(clippy::unwrap_used)]`. A buffer overflow during encoding is a
//! caller mistake (the buffer was sized too small), but it still surfaces as
//! [`TinybinError::NotEnoughSpace`] rather than a panic so that callers can
//! recover, resize and retry.
//!
//! ## Error Categories
//!
//! - **Space/stream errors** (`NotEnoughSpace`, `ShortRead`): the byte
//!   region ran out mid-operation.
//! - **Wire errors** (`MalformedVarint`, `LengthMismatch`, `InvalidString`):
//!   the input bytes do not form a valid encoding of the expected schema.
//! - **Type errors** (`UnsupportedKind`): the traversal met a shape outside
//!   the supported kind set (in practice: a double pointer).
//! - **Registration errors** (`DuplicateRegistration`,
//!   `ExpectedStructOrSerializer`, `IncompleteSerializer`,
//!   `DecodeMustMutate`): reported by the registry; nothing is inserted on
//!   failure.
//! - **Internal errors** (`Internal`): logic errors in the engine itself.
//!   These should not occur in production; please report them as bugs.

use std::fmt;
use std::str::Utf8Error;

/// A specialized `Result` type for tinybin operations.
pub type Result<T> = std::result::Result<T, TinybinError>;

/// The master error enum covering all failure domains in tinybin.
///
/// The first error encountered during a traversal wins and short-circuits
/// the call; any bytes already written to the output buffer are considered
/// invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinybinError {
    /// The caller-provided buffer is too small for the value being encoded.
    NotEnoughSpace {
        /// Cursor position when the reservation was attempted.
        pos: usize,
        /// Total capacity of the buffer.
        cap: usize,
        /// Number of bytes the operation needed.
        need: usize,
    },

    /// The decoder exhausted its input in the middle of a value.
    ///
    /// Trailing unread bytes after a successful decode are *not* an error;
    /// running out of bytes mid-value is.
    ShortRead {
        /// Cursor position when the read was attempted.
        pos: usize,
        /// Total length of the input.
        len: usize,
        /// Number of bytes the operation needed.
        need: usize,
    },

    /// A varint continuation chain ran longer than the 10-byte maximum, or
    /// its final group overflowed 64 bits.
    MalformedVarint,

    /// The traversal encountered a type outside the supported kind set.
    ///
    /// Carries the offending type's name. With static typing most
    /// unsupported shapes never compile; the remaining runtime case is a
    /// double pointer such as `Option<Option<T>>`.
    UnsupportedKind(&'static str),

    /// The length prefix of a fixed-size array did not match the array's
    /// statically known length.
    LengthMismatch {
        /// Length required by the target type.
        expected: usize,
        /// Length found on the wire.
        found: usize,
    },

    /// A decoded string was not valid UTF-8.
    InvalidString(Utf8Error),

    /// A type was registered twice through the error-reporting entrypoint.
    ///
    /// Re-registration never mutates registry state; the first registration
    /// stands.
    DuplicateRegistration(&'static str),

    /// Top-level registration was attempted for a type that is neither a
    /// struct nor a custom serializer.
    ExpectedStructOrSerializer(&'static str),

    /// Registration-time diagnostic: a type exposed part of the
    /// size/encode/decode capability triad but not all of it.
    ///
    /// In this crate the [`BinarySerializer`](crate::BinarySerializer)
    /// supertrait bounds make a partial triad a compile error, so this
    /// variant is kept for error-vocabulary parity with ports where
    /// capability detection is dynamic.
    IncompleteSerializer(&'static str),

    /// Registration-time diagnostic: a decode operation that cannot mutate
    /// its target.
    ///
    /// Enforced at compile time here by the `&mut self` receiver of
    /// [`BinaryDecoder::decode_from`](crate::BinaryDecoder::decode_from);
    /// kept for error-vocabulary parity, like `IncompleteSerializer`.
    DecodeMustMutate(&'static str),

    /// Logic error in the engine (descriptor/value disagreement, missing
    /// vtable for a known serializer). Indicates a bug in tinybin.
    Internal(String),
}

impl fmt::Display for TinybinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughSpace { pos, cap, need } => {
                write!(f, "not enough space: pos={pos} cap={cap} require={need}")
            }
            Self::ShortRead { pos, len, need } => {
                write!(f, "short read: pos={pos} len={len} require={need}")
            }
            Self::MalformedVarint => {
                write!(f, "malformed varint: continuation chain exceeds 10 bytes")
            }
            Self::UnsupportedKind(t) => write!(f, "unsupported kind: type [{t}]"),
            Self::LengthMismatch { expected, found } => write!(
                f,
                "array length mismatch: expected {expected}, found {found} on the wire"
            ),
            Self::InvalidString(e) => write!(f, "decoded string is not valid UTF-8: {e}"),
            Self::DuplicateRegistration(t) => write!(f, "duplicate registration of type {t}"),
            Self::ExpectedStructOrSerializer(t) => {
                write!(f, "expected a struct or BinarySerializer, got type {t}")
            }
            Self::IncompleteSerializer(t) => write!(
                f,
                "type {t} implements part of the size/encode/decode triad but not all of it"
            ),
            Self::DecodeMustMutate(t) => {
                write!(f, "decode operation of type {t} cannot mutate its target")
            }
            Self::Internal(s) => write!(f, "internal logic error: {s}"),
        }
    }
}

impl std::error::Error for TinybinError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidString(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Utf8Error> for TinybinError {
    fn from(err: Utf8Error) -> Self {
        Self::InvalidString(err)
    }
}
