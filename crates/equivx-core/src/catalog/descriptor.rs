//! Type and member descriptors.
//!
//! Descriptors are the declarative stand-in for runtime reflection: each
//! registered type states its kind, base class, interfaces, members, and
//! whether it iterates elements or maps keys to values.

use serde::Serialize;

use crate::catalog::provider::MemberProvider;
use crate::errors::Result;
use crate::model::{ObjectRef, TypeName, Value};

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    /// Built-in value type (`bool`, `i64`, `string`, ...)
    Scalar,
}

/// Kind of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
    /// Parameterised accessor; never compared structurally
    Indexer,
}

/// Visibility of a member's read accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadAccess {
    Public,
    /// Visible inside the declaring module only
    Internal,
    Private,
    /// Write-only member
    None,
}

/// A member as declared on a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDef {
    pub name: String,
    pub value_type: TypeName,
    pub kind: MemberKind,
    pub read_access: ReadAccess,
}

impl MemberDef {
    pub fn property(name: &str, value_type: impl Into<TypeName>) -> Self {
        Self {
            name: name.to_string(),
            value_type: value_type.into(),
            kind: MemberKind::Property,
            read_access: ReadAccess::Public,
        }
    }

    pub fn field(name: &str, value_type: impl Into<TypeName>) -> Self {
        Self {
            kind: MemberKind::Field,
            ..Self::property(name, value_type)
        }
    }

    pub fn indexer(value_type: impl Into<TypeName>) -> Self {
        Self {
            kind: MemberKind::Indexer,
            ..Self::property("Item", value_type)
        }
    }

    pub fn with_access(mut self, read_access: ReadAccess) -> Self {
        self.read_access = read_access;
        self
    }

    /// Publicly readable, non-indexer
    pub fn is_comparable(&self) -> bool {
        self.read_access == ReadAccess::Public && self.kind != MemberKind::Indexer
    }
}

/// A registered type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub kind: TypeKind,
    /// Base class (classes only)
    pub base: Option<TypeName>,
    /// Implemented interfaces for classes, extended interfaces for interfaces
    pub interfaces: Vec<TypeName>,
    /// Members in declaration order
    pub members: Vec<MemberDef>,
    /// Element types this type declares an iteration contract for
    pub enumerable_of: Vec<TypeName>,
    /// (key type, value type) when the type is an associative container
    pub dictionary_of: Option<(TypeName, TypeName)>,
}

impl TypeDescriptor {
    fn new(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            enumerable_of: Vec::new(),
            dictionary_of: None,
        }
    }

    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn scalar(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    pub fn extends(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn property(self, name: &str, value_type: impl Into<TypeName>) -> Self {
        self.member(MemberDef::property(name, value_type))
    }

    pub fn field(self, name: &str, value_type: impl Into<TypeName>) -> Self {
        self.member(MemberDef::field(name, value_type))
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn enumerable_of(mut self, element_type: impl Into<TypeName>) -> Self {
        self.enumerable_of.push(element_type.into());
        self
    }

    pub fn dictionary_of(
        mut self,
        key_type: impl Into<TypeName>,
        value_type: impl Into<TypeName>,
    ) -> Self {
        self.dictionary_of = Some((key_type.into(), value_type.into()));
        self
    }
}

/// A comparable member resolved against a concrete type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDescriptor {
    declaring_type: TypeName,
    name: String,
    value_type: TypeName,
    kind: MemberKind,
}

impl MemberDescriptor {
    pub fn new(declaring_type: TypeName, def: &MemberDef) -> Self {
        Self {
            declaring_type,
            name: def.name.clone(),
            value_type: def.value_type.clone(),
            kind: def.kind,
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> &TypeName {
        &self.value_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Same member identity: declaring type and name
    pub fn same_identity(&self, other: &MemberDescriptor) -> bool {
        self.declaring_type == other.declaring_type && self.name == other.name
    }

    /// Read the member from an object; an unset slot reads as null
    pub fn read(&self, target: &ObjectRef) -> Value {
        target.get(&self.name).unwrap_or(Value::Null)
    }

    /// Names match and one declaring type is, or derives from, the other.
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from the provider.
    pub fn is_equivalent_to(
        &self,
        other: &MemberDescriptor,
        provider: &dyn MemberProvider,
    ) -> Result<bool> {
        if self.name != other.name {
            return Ok(false);
        }
        Ok(provider.conforms_to(&self.declaring_type, &other.declaring_type)?
            || provider.conforms_to(&other.declaring_type, &self.declaring_type)?)
    }
}
