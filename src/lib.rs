//! # Tinybin
//!
//! A compact, schema-implicit binary codec for Rust: denser than a
//! fixed-width layout, simpler and faster than a self-describing stream.
//!
//! ## Overview
//!
//! Tinybin converts structured in-memory values to and from compact byte
//! sequences. The encoded form carries **no type tags**: the reader must
//! know the schema, i.e. decode into a value of the same shape that was
//! encoded. In exchange, the wire format is as dense as the data allows:
//! varint integers, bit-packed booleans, single-byte pointer presence
//! markers, and length prefixes only where a length is dynamic.
//!
//! ### Key Features
//!
//! *   **Type-directed traversal:** encoding and decoding walk the value's
//!     logical shape depth-first, left-to-right; the two directions mirror
//!     each other exactly.
//! *   **Registered-type cache:** struct field metadata (ignore/packed/
//!     serializer flags) is parsed once per type and cached process-wide,
//!     so traversal does no per-call re-derivation.
//! *   **Varint integers:** architecture-width integers (and `packed`
//!     fields of registered structs) use base-128 framing with zig-zag
//!     signed mapping; small magnitudes stay short.
//! *   **Bit-packed booleans:** `n` booleans occupy `⌈n/8⌉` bytes.
//! *   **Custom serializers:** a type can take over its own wire format by
//!     implementing the size/encode/decode capability triad.
//! *   **Caller-selected endianness:** fixed-width primitives honor the
//!     byte order chosen per [`Encoder`]/[`Decoder`] instance.
//!
//! ## Wire Format
//!
//! | Shape | Encoding |
//! |---|---|
//! | `bool` | 1 byte, `0x00` or `0x01` |
//! | `i8`/`u8` | 1 raw byte |
//! | `i16`–`i64`, `u16`–`u64` | fixed width, endian-ordered |
//! | `f32`/`f64` | IEEE-754 bit pattern as `u32`/`u64` |
//! | `Complex32`/`Complex64` | real then imaginary part |
//! | `isize`/`usize` | varint (zig-zag / plain), 1–10 bytes |
//! | `String` | varint byte length + UTF-8 bytes |
//! | `Vec<T>`, `[T; N]` | varint length + elements |
//! | `Vec<bool>`, `[bool; N]` | varint length + `⌈n/8⌉` packed bytes |
//! | `HashMap`/`BTreeMap` | varint entry count + key/value pairs |
//! | struct | concatenated non-ignored fields, nothing else |
//! | `Option<T>` | presence byte + payload if present |
//!
//! Fixed bool arrays inside structs drop the length prefix; the length is
//! already known from the field's type.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tinybin::TinybinObject;
//!
//! #[derive(Debug, Default, PartialEq, TinybinObject)]
//! struct Player {
//!     id: u32,
//!     #[tinybin(packed)]
//!     score: u64,
//!     name: String,
//!     #[tinybin(ignore)]
//!     session: u64,
//! }
//!
//! // Registration caches field metadata and enables `packed`.
//! tinybin::register::<Player>()?;
//!
//! let p = Player { id: 7, score: 900, name: "ada".into(), session: 1 };
//! let bytes = tinybin::encode(&p)?;
//! let back: Player = tinybin::decode_new(&bytes)?;
//! assert_eq!(back.id, p.id);
//! # Ok::<(), tinybin::TinybinError>(())
//! ```
//!
//! ## Registration
//!
//! [`register`] parses a struct's field metadata into the process-wide
//! cache and recursively registers field types. Registration is one-way
//! and idempotent in state; do it during startup, before concurrent
//! encode/decode traffic; the registry's write lock is only ever taken by
//! registration. Types providing the custom-serializer triad go through
//! [`register_serializer`], **before** any struct that embeds them.
//!
//! ### Safety and Error Handling
//!
//! * **Encapsulated behavior:** no `unsafe` code anywhere
//!   (`#![deny(unsafe_code)]`).
//! * **No panics:** no `unwrap()` or `panic!()` in the library (enforced by
//!   clippy lints); even encoding into a too-small buffer reports
//!   [`TinybinError::NotEnoughSpace`] instead of panicking.
//! * **Comprehensive errors:** all failures surface as [`TinybinError`].

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

// --- PUBLIC API MODULES ---
pub mod api;
pub mod coder;
pub mod decoder;
pub mod desc;
pub mod encoder;
pub mod endian;
pub mod error;
pub mod registry;
pub mod serial;
pub mod serializer;
pub mod size;
pub mod varint;

// --- MACRO SUPPORT MODULES ---

/// Runtime utilities used by the derived code.
#[doc(hidden)]
pub mod rt;

// Private modules
mod serial_impls;

// --- RE-EXPORTS ---

pub use api::{decode, decode_new, encode, encode_into, size_of};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use endian::{Endian, DEFAULT_ENDIAN};
pub use error::{Result, TinybinError};
pub use registry::{check_serializer, register, register_serializer, struct_info};
pub use registry::{FieldInfo, SerializerSwitch, StructInfo};
pub use serial::Serializable;
pub use serializer::{BinaryDecoder, BinaryEncoder, BinarySerializer, BinarySizer};

// Complex numbers are part of the supported kind set; re-export the carrier
// types so downstream code does not need its own num-complex dependency.
pub use num_complex::Complex;

// Re-export the derive macro so it is accessible as `tinybin::TinybinObject`
pub use tinybin_derive::TinybinObject;
