use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Name of the universal root type every type is assignable to
pub const OBJECT: &str = "object";
pub const BOOL: &str = "bool";
pub const INT: &str = "i64";
pub const UINT: &str = "u64";
pub const FLOAT: &str = "f64";
pub const STRING: &str = "string";
pub const BYTES: &str = "bytes";

/// Cheap, cloneable identifier of a registered type
///
/// Type names are compared by content. They are the only handle the engine
/// keeps on a type; everything else is looked up through a
/// [`MemberProvider`](crate::catalog::MemberProvider).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The universal root type
    pub fn object() -> Self {
        Self::new(OBJECT)
    }

    pub fn is_object(&self) -> bool {
        &*self.0 == OBJECT
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&TypeName> for TypeName {
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
