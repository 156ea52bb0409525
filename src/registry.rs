//! The registered-type cache.
//!
//! Struct field metadata is parsed once per type and cached process-wide so
//! the traversal never re-derives ignore/packed/serializer flags per call.
//! The registry also tracks which types participate through the custom
//! serializer capability set and holds their erased vtables.
//!
//! Registration is one-way: entries are never removed, and a `StructInfo`
//! is immutable once inserted (it is leaked to `&'static`). The write path
//! of the interior lock is taken only by registration, so the documented
//! contract is to register everything during startup and treat the maps as
//! effectively immutable afterwards. Because field serializer flags are
//! resolved against the serializer map at parse time, serializer types must
//! be registered before the structs that embed them.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::desc::{Kind, StructDesc, TypeDesc};
use crate::error::{Result, TinybinError};
use crate::serial::Serializable;
use crate::serializer::{vtable_of, BinarySerializer, SerializerVtable};

/// Tells a traversal node whether to consult the custom-serializer registry.
///
/// The top level starts at [`Check`](Self::Check) (or
/// [`Disable`](Self::Disable) when serializers are off for the call); struct
/// traversal then narrows each field to [`CheckOk`](Self::CheckOk) or
/// [`CheckFalse`](Self::CheckFalse) from cached flags so that descent does
/// no redundant lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializerSwitch {
    /// Custom serializers are globally off for this call.
    Disable,
    /// Consult the registry at each node.
    Check,
    /// Known not to be a serializer along this subpath.
    CheckFalse,
    /// Known serializer at this exact node.
    CheckOk,
}

impl SerializerSwitch {
    /// Switch value for a top-level traversal.
    pub fn top_level(enable: bool) -> Self {
        if enable {
            Self::Check
        } else {
            Self::Disable
        }
    }

    /// True unless serializers are disabled for the call.
    pub fn enabled(self) -> bool {
        !matches!(self, Self::Disable)
    }

    /// True if this node must query the registry itself.
    pub fn need_check(self) -> bool {
        matches!(self, Self::Check)
    }

    /// True if this subpath is known not to be a serializer.
    pub fn check_false(self) -> bool {
        matches!(self, Self::CheckFalse)
    }

    /// True if this exact node is a known serializer.
    pub fn check_ok(self) -> bool {
        matches!(self, Self::CheckOk)
    }

    /// Switch for a child node whose serializer flag is already known
    /// (cached struct-field metadata).
    pub fn sub_switch(self, is_serializer: bool) -> Self {
        if !self.enabled() {
            return Self::Disable;
        }
        if is_serializer {
            Self::CheckOk
        } else {
            Self::CheckFalse
        }
    }

    /// Switch for a child node whose serializer flag must be probed live
    /// (slice/array/map element types). One registry lookup per container,
    /// not per element.
    pub fn sub_switch_check(self, child: &'static TypeDesc) -> Self {
        if !self.enabled() {
            return Self::Disable;
        }
        self.sub_switch(query_serializer(child.indirect().type_id()))
    }
}

/// Cached metadata for one declared struct field.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    name: &'static str,
    ignore: bool,
    packed: bool,
    serializer: bool,
}

impl FieldInfo {
    /// The field's declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True if the field contributes zero bytes in both directions.
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// True if this integer field is varint-encoded.
    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// True if the field's (dereferenced) type was a registered serializer
    /// when the owning struct was parsed.
    pub fn is_serializer(&self) -> bool {
        self.serializer
    }
}

/// Pre-parsed field metadata for one registered struct.
///
/// Holds exactly one entry per declared field, in declaration order.
#[derive(Debug)]
pub struct StructInfo {
    desc: &'static StructDesc,
    type_name: &'static str,
    fields: Vec<FieldInfo>,
}

impl StructInfo {
    fn parse(desc: &'static StructDesc, type_name: &'static str, reg: &Registry) -> Self {
        let fields = desc
            .fields
            .iter()
            .map(|f| {
                let deep = (f.desc)().indirect();
                FieldInfo {
                    name: f.name,
                    ignore: f.ignore,
                    // The packed tag only means something on integer fields.
                    packed: f.packed && deep.kind().is_integer(),
                    serializer: reg.serializers.contains_key(&deep.type_id()),
                }
            })
            .collect();
        Self {
            desc,
            type_name,
            fields,
        }
    }

    /// The struct's bare name.
    pub fn name(&self) -> &'static str {
        self.desc.name
    }

    /// The described type's full name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Number of declared fields (including ignored ones).
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Metadata for field `i` in declaration order.
    pub fn field(&self, i: usize) -> Option<&FieldInfo> {
        self.fields.get(i)
    }

    /// The number of bytes every value of this struct occupies on the wire,
    /// or `None` when any field's length depends on the value. This is the
    /// fixed-layout measurement used for absent pointer payload
    /// placeholders.
    pub fn fixed_payload_size(&self) -> Option<usize> {
        let mut sum = 0;
        for (f, cached) in self.desc.fields.iter().zip(&self.fields) {
            if cached.ignore {
                continue;
            }
            if cached.packed {
                return None;
            }
            sum += (f.desc)().fixed_size_at(true)?;
        }
        Some(sum)
    }
}

#[derive(Default)]
struct Registry {
    structs: HashMap<TypeId, &'static StructInfo>,
    serializers: HashMap<TypeId, &'static SerializerVtable>,
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::default()))
}

/// Registers `T`'s struct metadata, recursively registering each field's
/// (dereferenced) type.
///
/// Only structs and custom serializers are registrable at the top level;
/// serializer types go through [`register_serializer`]. Registering the
/// same type twice through this entrypoint fails with
/// `DuplicateRegistration` but never mutates registry state.
pub fn register<T: Serializable>() -> Result<()> {
    regist_desc(T::DESC, true)
}

/// Registers `T` as a custom serializer, storing its erased
/// size/encode/decode vtable.
///
/// For container serializers (slice/array/map kinds) the key and element
/// types are registered as well; for struct serializers the struct metadata
/// is cached alongside the vtable. `Default` is required so the skip
/// traversal can decode into a scratch value.
pub fn register_serializer<T>() -> Result<()>
where
    T: Serializable + BinarySerializer + Default,
{
    regserializer::<T>(true)
}

/// True if `x`'s (dereferenced) type is a registered custom serializer.
pub fn check_serializer<T: Serializable>() -> bool {
    query_serializer(T::DESC.indirect().type_id())
}

/// Cached metadata for `T`, if `T` has been registered as a struct.
pub fn struct_info<T: Serializable>() -> Option<&'static StructInfo> {
    query_struct(TypeId::of::<T>())
}

fn regist_desc(desc: &'static TypeDesc, need_error: bool) -> Result<()> {
    let t = desc.indirect();
    match t.kind() {
        Kind::Struct(sd) => regstruct(t, sd, need_error),
        _ => {
            if query_serializer(t.type_id()) {
                // Already present through register_serializer.
                type_error(TinybinError::DuplicateRegistration(t.type_name()), need_error)
            } else {
                type_error(
                    TinybinError::ExpectedStructOrSerializer(t.type_name()),
                    need_error,
                )
            }
        }
    }
}

fn regstruct(t: &'static TypeDesc, sd: &'static StructDesc, need_error: bool) -> Result<()> {
    let inserted = {
        let mut reg = write_lock();
        if reg.structs.contains_key(&t.type_id()) {
            false
        } else {
            let info = StructInfo::parse(sd, t.type_name(), &reg);
            reg.structs.insert(t.type_id(), Box::leak(Box::new(info)));
            true
        }
    };
    if !inserted {
        return type_error(TinybinError::DuplicateRegistration(t.type_name()), need_error);
    }
    // Deep-register field types outside the lock; nested duplicates and
    // non-registrable kinds are silent here.
    for f in sd.fields {
        regist_desc((f.desc)(), false)?;
    }
    Ok(())
}

fn regserializer<T>(need_error: bool) -> Result<()>
where
    T: Serializable + BinarySerializer + Default,
{
    let id = TypeId::of::<T>();
    let inserted = {
        let mut reg = write_lock();
        if reg.serializers.contains_key(&id) {
            false
        } else {
            reg.serializers.insert(id, vtable_of::<T>());
            true
        }
    };
    if !inserted {
        return type_error(
            TinybinError::DuplicateRegistration(std::any::type_name::<T>()),
            need_error,
        );
    }
    // Register sub-types of data-set serializers.
    match T::DESC.kind() {
        Kind::Map(k, v) => {
            regist_desc(k(), false)?;
            regist_desc(v(), false)?;
        }
        Kind::Slice(e) | Kind::Array(_, e) => regist_desc(e(), false)?,
        Kind::Struct(sd) => regstruct(T::DESC, sd, false)?,
        _ => {}
    }
    Ok(())
}

fn type_error(err: TinybinError, need_error: bool) -> Result<()> {
    if need_error {
        Err(err)
    } else {
        Ok(())
    }
}

pub(crate) fn query_struct(id: TypeId) -> Option<&'static StructInfo> {
    read_lock().structs.get(&id).copied()
}

pub(crate) fn query_serializer(id: TypeId) -> bool {
    read_lock().serializers.contains_key(&id)
}

pub(crate) fn serializer_vtable(id: TypeId) -> Option<&'static SerializerVtable> {
    read_lock().serializers.get(&id).copied()
}

/// Resolves the vtable a node should delegate to, or `None` for structural
/// traversal. Pointer nodes never delegate themselves; their pointee does.
pub(crate) fn delegate_for(
    desc: &'static TypeDesc,
    ss: SerializerSwitch,
) -> Option<&'static SerializerVtable> {
    if desc.is_ptr() || !(ss.check_ok() || ss.need_check()) {
        return None;
    }
    serializer_vtable(desc.type_id())
}

fn read_lock() -> std::sync::RwLockReadGuard<'static, Registry> {
    match registry().read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_lock() -> std::sync::RwLockWriteGuard<'static, Registry> {
    match registry().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
