use std::sync::Arc;

use crate::catalog::descriptor::MemberDescriptor;
use crate::errors::Result;
use crate::model::TypeName;

/// Member-introspection seam between the engine and the type system
///
/// The engine never inspects types directly; it asks a provider. The default
/// implementation is [`TypeCatalog`](crate::catalog::TypeCatalog), but any
/// source of type metadata (generated code, a schema registry) can stand in.
///
/// Implementations must be shareable across threads: independent comparison
/// runs may consult the same provider concurrently.
pub trait MemberProvider: Send + Sync {
    /// True if the provider knows the type
    fn type_exists(&self, type_name: &TypeName) -> bool;

    /// Comparable members of a type, in catalog order
    ///
    /// # Errors
    ///
    /// `UnknownType` if the type, or any type in its hierarchy, is unknown.
    fn members(&self, type_name: &TypeName) -> Result<Arc<[MemberDescriptor]>>;

    /// Resolve a member by name.
    ///
    /// Returns the unique member named `name`. When several members share
    /// the name, the one whose value type equals `preferred_type` wins;
    /// otherwise the lookup is ambiguous and yields `None`.
    ///
    /// # Errors
    ///
    /// `UnknownType` as for [`MemberProvider::members`].
    fn find_member(
        &self,
        type_name: &TypeName,
        name: &str,
        preferred_type: Option<&TypeName>,
    ) -> Result<Option<MemberDescriptor>> {
        let members = self.members(type_name)?;
        let named: Vec<&MemberDescriptor> = members.iter().filter(|m| m.name() == name).collect();
        match named.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some((*only).clone())),
            several => {
                let mut preferred = several
                    .iter()
                    .filter(|m| Some(m.value_type()) == preferred_type);
                match (preferred.next(), preferred.next()) {
                    (Some(m), None) => Ok(Some((*m).clone())),
                    _ => Ok(None),
                }
            }
        }
    }

    /// Element types the type is enumerable for, first occurrence first
    ///
    /// # Errors
    ///
    /// `UnknownType` if the type is unknown.
    fn enumerable_element_types(&self, type_name: &TypeName) -> Result<Vec<TypeName>>;

    /// `(key type, value type)` if the type is an associative container
    ///
    /// # Errors
    ///
    /// `UnknownType` if the type is unknown.
    fn dictionary_shape(&self, type_name: &TypeName) -> Result<Option<(TypeName, TypeName)>>;

    /// True if a value of type `from` may stand where `to` is declared
    ///
    /// # Errors
    ///
    /// `UnknownType` if `from` is unknown.
    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> Result<bool>;

    /// `from` is `to` or derives from it. Types the provider does not know
    /// conform only to themselves and to `object`.
    ///
    /// # Errors
    ///
    /// `UnknownType` if a type in the hierarchy of `from` is unknown.
    fn conforms_to(&self, from: &TypeName, to: &TypeName) -> Result<bool> {
        if from == to || to.is_object() {
            return Ok(true);
        }
        if !self.type_exists(from) {
            return Ok(false);
        }
        self.is_assignable(from, to)
    }
}
