//! Dynamic object graph values.
//!
//! A [`Value`] is either a scalar or a reference to a shared heap node
//! ([`ObjectRef`]). Heap nodes carry their runtime type and one of three
//! payloads: named member slots, ordered items, or key/value entries.
//! Payloads sit behind a lock so graphs can be closed into cycles after the
//! nodes are allocated; identity is the address of the shared allocation.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::type_name::{self, TypeName};

/// A node value in an object graph
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Ref(ObjectRef),
}

impl Value {
    /// Runtime type of the value; `None` for null
    pub fn runtime_type(&self) -> Option<TypeName> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(TypeName::new(type_name::BOOL)),
            Value::Int(_) => Some(TypeName::new(type_name::INT)),
            Value::UInt(_) => Some(TypeName::new(type_name::UINT)),
            Value::Float(_) => Some(TypeName::new(type_name::FLOAT)),
            Value::Str(_) => Some(TypeName::new(type_name::STRING)),
            Value::Bytes(_) => Some(TypeName::new(type_name::BYTES)),
            Value::Ref(obj) => Some(obj.type_name().clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for everything except heap references
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Ref(_))
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Ref(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Value equality for scalars, identity for references.
    ///
    /// Integers, unsigned integers and floats compare across domains by
    /// numeric value; `NaN` equals `NaN`.
    pub fn scalar_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
            (a, b) => match (a.numeric(), b.numeric()) {
                (Some(x), Some(y)) => x.same_as(y),
                _ => false,
            },
        }
    }

    /// Equality used for dictionary keys.
    ///
    /// Like [`Value::scalar_eq`], but numbers only match within the same
    /// numeric domain: `Int(1)` and `Float(1.0)` are distinct keys.
    pub fn key_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_), Value::Int(_))
            | (Value::UInt(_), Value::UInt(_))
            | (Value::Float(_), Value::Float(_)) => self.scalar_eq(other),
            (Value::Int(_) | Value::UInt(_) | Value::Float(_), _)
            | (_, Value::Int(_) | Value::UInt(_) | Value::Float(_)) => false,
            _ => self.scalar_eq(other),
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Int(i) => Some(Numeric::Int(*i)),
            Value::UInt(u) => Some(Numeric::UInt(*u)),
            Value::Float(f) => Some(Numeric::Float(*f)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy)]
enum Numeric {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Numeric {
    fn same_as(self, other: Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            (Numeric::UInt(a), Numeric::UInt(b)) => a == b,
            (Numeric::Int(i), Numeric::UInt(u)) | (Numeric::UInt(u), Numeric::Int(i)) => {
                u64::try_from(i).map(|i| i == u).unwrap_or(false)
            }
            (Numeric::Float(a), Numeric::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Numeric::Float(f), Numeric::Int(i)) | (Numeric::Int(i), Numeric::Float(f)) => {
                is_whole(f) && (I64_MIN..I64_END).contains(&f) && f as i64 == i
            }
            (Numeric::Float(f), Numeric::UInt(u)) | (Numeric::UInt(u), Numeric::Float(f)) => {
                is_whole(f) && (0.0..U64_END).contains(&f) && f as u64 == u
            }
        }
    }
}

// Exact bounds: -2^63 is an i64, 2^63 and 2^64 are one past the ranges.
const I64_MIN: f64 = -9_223_372_036_854_775_808.0;
const I64_END: f64 = 9_223_372_036_854_775_808.0;
const U64_END: f64 = 18_446_744_073_709_551_616.0;

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::UInt(u) => write!(f, "UInt({})", u),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Bytes(b) => write!(f, "Bytes({:?})", b),
            Value::Ref(obj) => fmt::Debug::fmt(obj, f),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Ref(v)
    }
}

impl From<&ObjectRef> for Value {
    fn from(v: &ObjectRef) -> Self {
        Value::Ref(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Which payload a heap node carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Members,
    Items,
    Entries,
}

#[derive(Debug)]
enum Payload {
    Members(Vec<(String, Value)>),
    Items(Vec<Value>),
    Entries(Vec<(Value, Value)>),
}

struct HeapObject {
    type_name: TypeName,
    payload: RwLock<Payload>,
}

/// Shared, identity-bearing reference to a heap node
///
/// Cloning an `ObjectRef` clones the handle, not the node. Readers receive
/// snapshots of the payload so no lock is held while a caller recurses into
/// the children; this keeps self-referential graphs safe to walk.
#[derive(Clone)]
pub struct ObjectRef(Arc<HeapObject>);

impl ObjectRef {
    fn with_payload(type_name: impl Into<TypeName>, payload: Payload) -> Self {
        Self(Arc::new(HeapObject {
            type_name: type_name.into(),
            payload: RwLock::new(payload),
        }))
    }

    /// New object instance with no member slots set
    pub fn instance(type_name: impl Into<TypeName>) -> Self {
        Self::with_payload(type_name, Payload::Members(Vec::new()))
    }

    /// New collection holding `items` in order
    pub fn collection<I, V>(type_name: impl Into<TypeName>, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::with_payload(
            type_name,
            Payload::Items(items.into_iter().map(Into::into).collect()),
        )
    }

    /// New dictionary holding `entries`; later duplicates of a key replace earlier ones
    pub fn dictionary<I, K, V>(type_name: impl Into<TypeName>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let dict = Self::with_payload(type_name, Payload::Entries(Vec::new()));
        for (k, v) in entries {
            dict.insert(k, v);
        }
        dict
    }

    /// Builder form of [`ObjectRef::set`]
    pub fn with(self, member: &str, value: impl Into<Value>) -> Self {
        self.set(member, value);
        self
    }

    pub fn type_name(&self) -> &TypeName {
        &self.0.type_name
    }

    /// Address of the shared node, stable for the node's lifetime
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn shape(&self) -> PayloadShape {
        match &*self.read() {
            Payload::Members(_) => PayloadShape::Members,
            Payload::Items(_) => PayloadShape::Items,
            Payload::Entries(_) => PayloadShape::Entries,
        }
    }

    /// Set a member slot, replacing any previous value. No-op on collections
    /// and dictionaries.
    pub fn set(&self, member: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Payload::Members(slots) = &mut *self.write() {
            match slots.iter_mut().find(|(name, _)| name == member) {
                Some(slot) => slot.1 = value,
                None => slots.push((member.to_string(), value)),
            }
        }
    }

    /// Append an item. No-op unless the node is a collection.
    pub fn push(&self, item: impl Into<Value>) {
        let item = item.into();
        if let Payload::Items(items) = &mut *self.write() {
            items.push(item);
        }
    }

    /// Insert or replace a dictionary entry. No-op unless the node is a dictionary.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
        let (key, value) = (key.into(), value.into());
        if let Payload::Entries(entries) = &mut *self.write() {
            match entries.iter_mut().find(|(k, _)| k.key_eq(&key)) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Value of a member slot, if the node is an instance and the slot is set
    pub fn get(&self, member: &str) -> Option<Value> {
        match &*self.read() {
            Payload::Members(slots) => slots
                .iter()
                .find(|(name, _)| name == member)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Snapshot of the member slots in insertion order
    pub fn members(&self) -> Option<Vec<(String, Value)>> {
        match &*self.read() {
            Payload::Members(slots) => Some(slots.clone()),
            _ => None,
        }
    }

    /// Snapshot of the items of a collection
    pub fn items(&self) -> Option<Vec<Value>> {
        match &*self.read() {
            Payload::Items(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Snapshot of the entries of a dictionary, in insertion order
    pub fn entries(&self) -> Option<Vec<(Value, Value)>> {
        match &*self.read() {
            Payload::Entries(entries) => Some(entries.clone()),
            _ => None,
        }
    }

    /// Number of slots, items, or entries
    pub fn len(&self) -> usize {
        match &*self.read() {
            Payload::Members(slots) => slots.len(),
            Payload::Items(items) => items.len(),
            Payload::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Payload> {
        self.0.payload.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Payload> {
        self.0.payload.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Never walks the payload: graphs may be cyclic.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({}@{:#x})", self.type_name(), self.identity())
    }
}
