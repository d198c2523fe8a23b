//! Node selectors shared by every rule kind.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{MemberDescriptor, MemberProvider};
use crate::errors::Result;
use crate::model::{Path, PathPattern, TypeName};

/// What a rule can see about a node
///
/// Built from the expectation side only, so rules behave the same whichever
/// side of a comparison is structurally larger.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub path: Path,
    /// Statically known type: member value type, element type, or root type
    pub declared_type: Option<TypeName>,
    /// Runtime type of the expectation; `None` when it is null
    pub runtime_type: Option<TypeName>,
    /// Member that led to this node, if it was reached through a member
    pub member: Option<MemberDescriptor>,
}

impl NodeInfo {
    pub fn root(declared_type: Option<TypeName>, runtime_type: Option<TypeName>) -> Self {
        Self {
            path: Path::root(),
            declared_type,
            runtime_type,
            member: None,
        }
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Reached through a member, as opposed to an index, a key, or the root
    pub fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// Runtime type, or the declared type when the expectation is null
    pub fn type_for_rules(&self) -> Option<&TypeName> {
        self.runtime_type.as_ref().or(self.declared_type.as_ref())
    }
}

/// Caller-supplied node predicate
pub type NodePredicate = Arc<dyn Fn(&NodeInfo) -> bool + Send + Sync>;

/// Which nodes a rule applies to
#[derive(Clone)]
pub enum Selector {
    Any,
    Path(PathPattern),
    /// A member by declaring type and name. Members declared on a base or
    /// derived type of `declaring_type` with the same name also match.
    Member {
        declaring_type: TypeName,
        name: String,
    },
    /// Nodes whose expectation runtime type is exactly the given type;
    /// subtypes do not match. A null expectation is judged by its declared
    /// type.
    TypeIs(TypeName),
    Predicate(NodePredicate),
}

impl Selector {
    /// Exact selection of a node
    ///
    /// # Errors
    ///
    /// Propagates `UnknownType` from the provider.
    pub fn matches(&self, node: &NodeInfo, provider: &dyn MemberProvider) -> Result<bool> {
        match self {
            Selector::Any => Ok(true),
            Selector::Path(pattern) => Ok(pattern.matches(&node.path)),
            Selector::Member {
                declaring_type,
                name,
            } => match &node.member {
                Some(member) if member.name() == name => {
                    related_types(member.declaring_type(), declaring_type, provider)
                }
                _ => Ok(false),
            },
            Selector::TypeIs(target) => Ok(node.type_for_rules() == Some(target)),
            Selector::Predicate(predicate) => Ok(predicate(node)),
        }
    }

    /// Selection of the node itself or of any ancestor a path pattern names
    pub(crate) fn covers(&self, node: &NodeInfo, provider: &dyn MemberProvider) -> Result<bool> {
        match self {
            Selector::Path(pattern) => Ok(pattern.covers(&node.path)),
            other => other.matches(node, provider),
        }
    }

    /// The node is an ancestor of a node a path pattern names
    pub(crate) fn leads_to(&self, node: &NodeInfo) -> bool {
        match self {
            Selector::Path(pattern) => pattern.leads_to(&node.path),
            _ => false,
        }
    }
}

fn related_types(a: &TypeName, b: &TypeName, provider: &dyn MemberProvider) -> Result<bool> {
    Ok(provider.conforms_to(a, b)? || provider.conforms_to(b, a)?)
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => f.write_str("Any"),
            Selector::Path(pattern) => write!(f, "Path({})", pattern),
            Selector::Member {
                declaring_type,
                name,
            } => write!(f, "Member({}.{})", declaring_type, name),
            Selector::TypeIs(type_name) => write!(f, "TypeIs({})", type_name),
            Selector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => f.write_str("every node"),
            Selector::Path(pattern) => write!(f, "path {}", pattern),
            Selector::Member {
                declaring_type,
                name,
            } => write!(f, "member {}.{}", declaring_type, name),
            Selector::TypeIs(type_name) => write!(f, "type {}", type_name),
            Selector::Predicate(_) => f.write_str("nodes matching a predicate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MemberDef, TypeCatalog, TypeDescriptor};

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with_type(TypeDescriptor::class("Person").property("Name", "string"))
            .unwrap()
            .with_type(TypeDescriptor::class("Customer").extends("Person"))
            .unwrap()
    }

    fn name_node(declaring: &str) -> NodeInfo {
        let member = MemberDescriptor::new(
            TypeName::new(declaring),
            &MemberDef::property("Name", "string"),
        );
        NodeInfo {
            path: Path::root().child_member("Name"),
            declared_type: Some(TypeName::new("string")),
            runtime_type: Some(TypeName::new("string")),
            member: Some(member),
        }
    }

    #[test]
    fn test_member_selector_tolerates_hierarchy() {
        let catalog = catalog();
        let selector = Selector::Member {
            declaring_type: TypeName::new("Customer"),
            name: "Name".to_string(),
        };

        assert!(selector.matches(&name_node("Person"), &catalog).unwrap());
        assert!(!Selector::Member {
            declaring_type: TypeName::new("string"),
            name: "Name".to_string(),
        }
        .matches(&name_node("Person"), &catalog)
        .unwrap());
    }

    #[test]
    fn test_type_selector_uses_declared_type_for_null() {
        let catalog = catalog();
        let node = NodeInfo::root(Some(TypeName::new("Customer")), None);

        assert!(Selector::TypeIs(TypeName::new("Customer"))
            .matches(&node, &catalog)
            .unwrap());
        assert!(!Selector::TypeIs(TypeName::new("string"))
            .matches(&node, &catalog)
            .unwrap());
    }

    #[test]
    fn test_type_selector_ignores_subtypes() {
        let catalog = catalog();
        let node = NodeInfo::root(
            Some(TypeName::new("Person")),
            Some(TypeName::new("Customer")),
        );

        assert!(!Selector::TypeIs(TypeName::new("Person"))
            .matches(&node, &catalog)
            .unwrap());
        assert!(Selector::TypeIs(TypeName::new("Customer"))
            .matches(&node, &catalog)
            .unwrap());
    }

    #[test]
    fn test_path_selector_covers_descendants() {
        let catalog = catalog();
        let selector = Selector::Path(PathPattern::parse("Name").unwrap());
        let mut node = name_node("Person");
        node.path = node.path.child_member("Length");

        assert!(!selector.matches(&node, &catalog).unwrap());
        assert!(selector.covers(&node, &catalog).unwrap());
        assert!(!selector.leads_to(&node));
    }

    #[test]
    fn test_predicate_selector_sees_node() {
        let catalog = catalog();
        let selector = Selector::Predicate(Arc::new(|node: &NodeInfo| node.depth() == 1));
        assert!(selector.matches(&name_node("Person"), &catalog).unwrap());
        assert_eq!(format!("{:?}", selector), "Predicate(..)");
    }
}
