//! Per-node comparison strategy selection.

use std::fmt;
use std::sync::Arc;

use crate::catalog::MemberProvider;
use crate::errors::Result;
use crate::model::{ObjectRef, PayloadShape, TypeName, Value};
use crate::rules::options::{EquivalencyOptions, Inclusion, TypeSelection};
use crate::rules::selector::NodeInfo;
use crate::rules::ValueComparer;

/// How a node is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStrategy {
    Skip,
    PrimitiveEquality,
    StructuralMembers,
    Enumerable,
    Dictionary,
    CustomComparer,
}

impl ComparisonStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonStrategy::Skip => "skip",
            ComparisonStrategy::PrimitiveEquality => "primitive_equality",
            ComparisonStrategy::StructuralMembers => "structural_members",
            ComparisonStrategy::Enumerable => "enumerable",
            ComparisonStrategy::Dictionary => "dictionary",
            ComparisonStrategy::CustomComparer => "custom_comparer",
        }
    }
}

impl fmt::Display for ComparisonStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected strategy with the type information it needs to run
#[derive(Clone)]
pub enum StrategyDecision {
    Skip,
    Custom {
        applicable_type: TypeName,
        comparer: Arc<dyn ValueComparer>,
    },
    Dictionary {
        key_type: TypeName,
        value_type: TypeName,
    },
    Enumerable {
        element_type: TypeName,
    },
    /// Enumerable for several element types; cannot be compared
    AmbiguousEnumerable {
        element_types: Vec<TypeName>,
    },
    Structural {
        members_of: TypeName,
    },
    Primitive,
}

impl StrategyDecision {
    pub fn strategy(&self) -> ComparisonStrategy {
        match self {
            StrategyDecision::Skip => ComparisonStrategy::Skip,
            StrategyDecision::Custom { .. } => ComparisonStrategy::CustomComparer,
            StrategyDecision::Dictionary { .. } => ComparisonStrategy::Dictionary,
            StrategyDecision::Enumerable { .. } | StrategyDecision::AmbiguousEnumerable { .. } => {
                ComparisonStrategy::Enumerable
            }
            StrategyDecision::Structural { .. } => ComparisonStrategy::StructuralMembers,
            StrategyDecision::Primitive => ComparisonStrategy::PrimitiveEquality,
        }
    }
}

impl fmt::Debug for StrategyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyDecision::Custom {
                applicable_type, ..
            } => write!(f, "Custom({})", applicable_type),
            StrategyDecision::Dictionary {
                key_type,
                value_type,
            } => write!(f, "Dictionary({}, {})", key_type, value_type),
            StrategyDecision::Enumerable { element_type } => {
                write!(f, "Enumerable({})", element_type)
            }
            StrategyDecision::AmbiguousEnumerable { element_types } => {
                write!(f, "AmbiguousEnumerable({:?})", element_types)
            }
            StrategyDecision::Structural { members_of } => write!(f, "Structural({})", members_of),
            other => f.write_str(other.strategy().as_str()),
        }
    }
}

/// Outcome of strategy selection for one node
#[derive(Debug, Clone)]
pub struct Selection {
    pub decision: StrategyDecision,
    /// The node is included, or lies below an included node; descendants
    /// skip inclusion filtering
    pub within_inclusion: bool,
}

impl Selection {
    fn skip() -> Self {
        Self {
            decision: StrategyDecision::Skip,
            within_inclusion: false,
        }
    }
}

/// Choose how to compare a node. First match wins:
///
/// 1. excluded, or filtered out by inclusions: `Skip`
/// 2. a custom comparer rule matches: `Custom`
/// 3. scalars and nulls: `Primitive`
/// 4. the effective type maps keys to values: `Dictionary`
/// 5. the effective type is enumerable: `Enumerable` (or ambiguous)
/// 6. the effective type has members: `Structural`
/// 7. otherwise `Primitive` (reference identity)
///
/// # Errors
///
/// Propagates `UnknownType` from the provider.
pub fn select_strategy(
    node: &NodeInfo,
    expected: &Value,
    within_inclusion: bool,
    options: &EquivalencyOptions,
    provider: &dyn MemberProvider,
) -> Result<Selection> {
    if options.is_excluded(node, provider)? {
        return Ok(Selection::skip());
    }

    let mut within = within_inclusion;
    if !within && options.has_inclusions() && node.is_member() {
        match options.inclusion_of(node, provider)? {
            Inclusion::Included => within = true,
            Inclusion::OnTheWay => {}
            Inclusion::Outside => return Ok(Selection::skip()),
        }
    }

    Ok(Selection {
        decision: decide(node, expected, options, provider)?,
        within_inclusion: within,
    })
}

fn decide(
    node: &NodeInfo,
    expected: &Value,
    options: &EquivalencyOptions,
    provider: &dyn MemberProvider,
) -> Result<StrategyDecision> {
    if let Some((applicable_type, comparer)) = options.custom_comparer_for(node, provider)? {
        return Ok(StrategyDecision::Custom {
            applicable_type,
            comparer,
        });
    }

    let object = match expected {
        Value::Ref(object) => object,
        _ => return Ok(StrategyDecision::Primitive),
    };
    let effective = effective_type(node, object, options);

    match object.shape() {
        PayloadShape::Entries => {
            let (key_type, value_type) = match provider.dictionary_shape(&effective)? {
                Some(shape) => shape,
                None => provider
                    .dictionary_shape(object.type_name())?
                    .unwrap_or_else(|| (TypeName::object(), TypeName::object())),
            };
            Ok(StrategyDecision::Dictionary {
                key_type,
                value_type,
            })
        }
        PayloadShape::Items => {
            let mut element_types = provider.enumerable_element_types(&effective)?;
            if element_types.is_empty() && effective != *object.type_name() {
                element_types = provider.enumerable_element_types(object.type_name())?;
            }
            Ok(match element_types.len() {
                0 => StrategyDecision::Enumerable {
                    element_type: TypeName::object(),
                },
                1 => StrategyDecision::Enumerable {
                    element_type: element_types.remove(0),
                },
                _ => StrategyDecision::AmbiguousEnumerable { element_types },
            })
        }
        PayloadShape::Members => {
            if provider.members(&effective)?.is_empty() {
                Ok(StrategyDecision::Primitive)
            } else {
                Ok(StrategyDecision::Structural {
                    members_of: effective,
                })
            }
        }
    }
}

/// Declared mode uses the declared type unless it is missing or `object`;
/// runtime mode always uses the expectation's own type.
fn effective_type(node: &NodeInfo, object: &ObjectRef, options: &EquivalencyOptions) -> TypeName {
    match (options.type_selection(), &node.declared_type) {
        (TypeSelection::Declared, Some(declared)) if !declared.is_object() => declared.clone(),
        _ => object.type_name().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TypeCatalog, TypeDescriptor};
    use crate::model::Path;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with_type(TypeDescriptor::class("Person").property("Name", "string"))
            .unwrap()
            .with_type(
                TypeDescriptor::class("Customer")
                    .extends("Person")
                    .property("Age", "i64"),
            )
            .unwrap()
            .with_type(TypeDescriptor::class("Marker"))
            .unwrap()
            .with_type(
                TypeDescriptor::class("Both")
                    .enumerable_of("string")
                    .enumerable_of("i64"),
            )
            .unwrap()
    }

    fn decide_root(
        expected: &Value,
        declared: Option<&str>,
        options: &EquivalencyOptions,
    ) -> StrategyDecision {
        let node = NodeInfo::root(declared.map(TypeName::new), expected.runtime_type());
        select_strategy(&node, expected, false, options, &catalog())
            .unwrap()
            .decision
    }

    #[test]
    fn test_scalars_are_primitive() {
        let options = EquivalencyOptions::new();
        for value in [Value::Null, Value::Int(1), "x".into(), Value::Bytes(vec![1])] {
            assert_eq!(
                decide_root(&value, None, &options).strategy(),
                ComparisonStrategy::PrimitiveEquality
            );
        }
    }

    #[test]
    fn test_custom_comparer_wins_over_structure() {
        let options =
            EquivalencyOptions::new().using("Customer", |_: &Value, _: &Value| true);
        let customer = Value::from(ObjectRef::instance("Customer"));
        assert_eq!(
            decide_root(&customer, None, &options).strategy(),
            ComparisonStrategy::CustomComparer
        );
    }

    #[test]
    fn test_declared_type_limits_members() {
        let customer = Value::from(ObjectRef::instance("Customer"));
        let declared = EquivalencyOptions::new();
        let runtime = EquivalencyOptions::new().respecting_runtime_types();

        match decide_root(&customer, Some("Person"), &declared) {
            StrategyDecision::Structural { members_of } => assert_eq!(members_of, "Person"),
            other => panic!("unexpected {:?}", other),
        }
        match decide_root(&customer, Some("Person"), &runtime) {
            StrategyDecision::Structural { members_of } => assert_eq!(members_of, "Customer"),
            other => panic!("unexpected {:?}", other),
        }
        // `object` as declared type falls back to the runtime type
        match decide_root(&customer, Some("object"), &declared) {
            StrategyDecision::Structural { members_of } => assert_eq!(members_of, "Customer"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_memberless_objects_compare_by_identity() {
        let marker = Value::from(ObjectRef::instance("Marker"));
        assert_eq!(
            decide_root(&marker, None, &EquivalencyOptions::new()).strategy(),
            ComparisonStrategy::PrimitiveEquality
        );
    }

    #[test]
    fn test_enumerable_for_several_types_is_ambiguous() {
        let both = Value::from(ObjectRef::collection("Both", ["a"]));
        match decide_root(&both, None, &EquivalencyOptions::new()) {
            StrategyDecision::AmbiguousEnumerable { element_types } => {
                assert_eq!(element_types.len(), 2)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unregistered_collections_fall_back_to_object_elements() {
        let list = Value::from(ObjectRef::collection("object", [1, 2]));
        match decide_root(&list, None, &EquivalencyOptions::new()) {
            StrategyDecision::Enumerable { element_type } => assert!(element_type.is_object()),
            other => panic!("unexpected {:?}", other),
        }
        let dict = Value::from(ObjectRef::dictionary("object", [("a", 1)]));
        assert_eq!(
            decide_root(&dict, None, &EquivalencyOptions::new()).strategy(),
            ComparisonStrategy::Dictionary
        );
    }

    #[test]
    fn test_excluded_member_is_skipped_before_anything_else() {
        let options = EquivalencyOptions::new()
            .excluding("Name")
            .unwrap()
            .using("string", |_: &Value, _: &Value| -> bool { panic!("must not run") });
        let node = NodeInfo {
            path: Path::root().child_member("Name"),
            declared_type: Some(TypeName::new("string")),
            runtime_type: Some(TypeName::new("string")),
            member: None,
        };
        let selection =
            select_strategy(&node, &"x".into(), false, &options, &catalog()).unwrap();
        assert_eq!(selection.decision.strategy(), ComparisonStrategy::Skip);
    }
}
