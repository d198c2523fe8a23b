//! Member catalog: type descriptors and the member-provider seam.

pub mod descriptor;
pub mod provider;
pub mod type_catalog;

pub use descriptor::{MemberDef, MemberDescriptor, MemberKind, ReadAccess, TypeDescriptor, TypeKind};
pub use provider::MemberProvider;
pub use type_catalog::TypeCatalog;
