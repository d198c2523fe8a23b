//! Default member provider backed by registered type descriptors.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use crate::catalog::descriptor::{MemberDescriptor, TypeDescriptor, TypeKind};
use crate::catalog::provider::MemberProvider;
use crate::errors::{EquivError, Result};
use crate::model::type_name::{self, TypeName};

/// Registry of type descriptors with a memoized member cache
///
/// Member lists are computed on first request per type and cached behind a
/// lock, so a catalog can be shared by concurrent comparison runs.
/// Registering a type clears the cache.
#[derive(Debug)]
pub struct TypeCatalog {
    types: HashMap<TypeName, TypeDescriptor>,
    member_cache: RwLock<HashMap<TypeName, Arc<[MemberDescriptor]>>>,
}

impl TypeCatalog {
    /// Create a catalog holding only the built-in types
    pub fn new() -> Self {
        let mut types = HashMap::new();
        types.insert(TypeName::object(), TypeDescriptor::class(type_name::OBJECT));
        for scalar in [
            type_name::BOOL,
            type_name::INT,
            type_name::UINT,
            type_name::FLOAT,
            type_name::STRING,
            type_name::BYTES,
        ] {
            types.insert(TypeName::new(scalar), TypeDescriptor::scalar(scalar));
        }
        Self {
            types,
            member_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Register a type.
    ///
    /// Referenced base and interface types may be registered later; they are
    /// resolved lazily on lookup.
    ///
    /// # Errors
    ///
    /// - `DuplicateType` if the name is already registered
    /// - `InvalidBase` if a non-class declares a base class
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<()> {
        if self.types.contains_key(&descriptor.name) {
            return Err(EquivError::DuplicateType {
                type_name: descriptor.name.to_string(),
            });
        }
        if let (Some(base), true) = (&descriptor.base, descriptor.kind != TypeKind::Class) {
            return Err(EquivError::InvalidBase {
                type_name: descriptor.name.to_string(),
                base: base.to_string(),
                reason: "only classes have a base class".to_string(),
            });
        }
        tracing::debug!(type_name = %descriptor.name, kind = ?descriptor.kind, "register_type");
        self.types.insert(descriptor.name.clone(), descriptor);
        self.member_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }

    /// Builder form of [`TypeCatalog::register`]
    ///
    /// # Errors
    ///
    /// As for [`TypeCatalog::register`].
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Result<Self> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Look up a descriptor
    ///
    /// # Errors
    ///
    /// `UnknownType` if the type is not registered.
    pub fn descriptor(&self, type_name: &TypeName) -> Result<&TypeDescriptor> {
        self.types
            .get(type_name)
            .ok_or_else(|| EquivError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    /// Number of registered types, built-ins included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Derived-before-base; same name and value type is a duplicate, a
    /// different value type is shadowing and both are kept.
    fn collect_class_members(&self, type_name: &TypeName) -> Result<Vec<MemberDescriptor>> {
        let mut collected: Vec<MemberDescriptor> = Vec::new();
        let mut seen_types = HashSet::new();
        let mut current = Some(type_name.clone());

        while let Some(name) = current {
            if !seen_types.insert(name.clone()) {
                break;
            }
            let descriptor = self.descriptor(&name)?;
            for def in descriptor.members.iter().filter(|d| d.is_comparable()) {
                let duplicate = collected
                    .iter()
                    .any(|m| m.name() == def.name && *m.value_type() == def.value_type);
                if !duplicate {
                    collected.push(MemberDescriptor::new(name.clone(), def));
                }
            }
            current = descriptor.base.clone();
        }
        Ok(collected)
    }

    /// Breadth-first over the interface lattice. Each dequeued interface's
    /// unseen members go to the front of the list.
    fn collect_interface_members(&self, type_name: &TypeName) -> Result<Vec<MemberDescriptor>> {
        let mut collected: Vec<MemberDescriptor> = Vec::new();
        let mut considered = vec![type_name.clone()];
        let mut queue = VecDeque::from([type_name.clone()]);

        while let Some(name) = queue.pop_front() {
            let descriptor = self.descriptor(&name)?;
            for parent in &descriptor.interfaces {
                if !considered.contains(parent) {
                    considered.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
            let fresh: Vec<MemberDescriptor> = descriptor
                .members
                .iter()
                .filter(|d| d.is_comparable())
                .map(|d| MemberDescriptor::new(name.clone(), d))
                .filter(|m| !collected.iter().any(|c| c.same_identity(m)))
                .collect();
            let older = std::mem::replace(&mut collected, fresh);
            collected.extend(older);
        }
        Ok(collected)
    }

    /// The type itself, then base classes and interfaces breadth-first
    fn hierarchy(&self, type_name: &TypeName) -> Result<Vec<&TypeDescriptor>> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([type_name.clone()]);

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let descriptor = self.descriptor(&name)?;
            if let Some(base) = &descriptor.base {
                queue.push_back(base.clone());
            }
            queue.extend(descriptor.interfaces.iter().cloned());
            ordered.push(descriptor);
        }
        Ok(ordered)
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberProvider for TypeCatalog {
    fn type_exists(&self, type_name: &TypeName) -> bool {
        self.types.contains_key(type_name)
    }

    fn members(&self, type_name: &TypeName) -> Result<Arc<[MemberDescriptor]>> {
        if let Some(cached) = self
            .member_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
        {
            return Ok(cached.clone());
        }

        let members: Arc<[MemberDescriptor]> = match self.descriptor(type_name)?.kind {
            TypeKind::Class => self.collect_class_members(type_name)?.into(),
            TypeKind::Interface => self.collect_interface_members(type_name)?.into(),
            TypeKind::Scalar => Arc::from(Vec::new()),
        };
        tracing::trace!(type_name = %type_name, member_count = members.len(), "members_cached");

        self.member_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.clone(), members.clone());
        Ok(members)
    }

    fn enumerable_element_types(&self, type_name: &TypeName) -> Result<Vec<TypeName>> {
        let mut element_types: Vec<TypeName> = Vec::new();
        for descriptor in self.hierarchy(type_name)? {
            for element in &descriptor.enumerable_of {
                if !element_types.contains(element) {
                    element_types.push(element.clone());
                }
            }
        }
        Ok(element_types)
    }

    fn dictionary_shape(&self, type_name: &TypeName) -> Result<Option<(TypeName, TypeName)>> {
        Ok(self
            .hierarchy(type_name)?
            .into_iter()
            .find_map(|d| d.dictionary_of.clone()))
    }

    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> Result<bool> {
        if to.is_object() || from == to {
            return Ok(true);
        }
        Ok(self.hierarchy(from)?.iter().any(|d| &d.name == to))
    }
}
