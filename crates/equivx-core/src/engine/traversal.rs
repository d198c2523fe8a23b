//! Per-call traversal state and the node dispatcher.

use crate::catalog::MemberProvider;
use crate::engine::cycle::VisitedSet;
use crate::errors::Result;
use crate::model::{ObjectRef, PayloadShape, Path, TypeName, Value};
use crate::report::{Difference, DifferenceKind, ValueRenderer};
use crate::rules::{
    select_strategy, CyclicReferenceHandling, EquivalencyOptions, NodeInfo, Selection,
    StrategyDecision,
};

/// All mutable state of one comparison run
///
/// Owned by a single call; nothing here is shared between runs.
pub(crate) struct Traversal<'a> {
    pub(super) options: &'a EquivalencyOptions,
    pub(super) provider: &'a dyn MemberProvider,
    pub(super) renderer: ValueRenderer,
    visited: VisitedSet,
    pub(super) differences: Vec<Difference>,
}

impl<'a> Traversal<'a> {
    pub(crate) fn new(options: &'a EquivalencyOptions, provider: &'a dyn MemberProvider) -> Self {
        Self {
            options,
            provider,
            renderer: ValueRenderer::new(options.limits().max_value_chars),
            visited: VisitedSet::new(),
            differences: Vec::new(),
        }
    }

    pub(crate) fn into_differences(self) -> Vec<Difference> {
        self.differences
    }

    /// Select a strategy for the node and run it
    pub(crate) fn visit(
        &mut self,
        actual: &Value,
        expected: &Value,
        node: &NodeInfo,
        within_inclusion: bool,
    ) -> Result<()> {
        let selection = select_strategy(node, expected, within_inclusion, self.options, self.provider)?;
        self.visit_selected(actual, expected, node, selection)
    }

    pub(super) fn visit_selected(
        &mut self,
        actual: &Value,
        expected: &Value,
        node: &NodeInfo,
        selection: Selection,
    ) -> Result<()> {
        tracing::trace!(
            path = %node.path,
            strategy = %selection.decision.strategy(),
            "strategy_selected"
        );
        let within = selection.within_inclusion;

        match selection.decision {
            StrategyDecision::Skip => Ok(()),
            StrategyDecision::Custom {
                applicable_type,
                comparer,
            } => self.compare_custom(actual, expected, &node.path, &applicable_type, &*comparer),
            StrategyDecision::Primitive => {
                self.compare_primitive(actual, expected, &node.path);
                Ok(())
            }
            StrategyDecision::AmbiguousEnumerable { element_types } => {
                let listed: Vec<&str> = element_types.iter().map(TypeName::as_str).collect();
                self.record(Difference::new(
                    DifferenceKind::ConfigurationAmbiguity,
                    node.path.clone(),
                    format!(
                        "Subject is enumerable for more than one type. It is not known which type should be used for equivalence. The enumerable interfaces are: {}",
                        listed.join(", ")
                    ),
                ));
                Ok(())
            }
            StrategyDecision::Structural { members_of } => {
                self.within_branch(expected, node, |t, object| {
                    t.compare_members(actual, expected, object, node, &members_of, within)
                })
            }
            StrategyDecision::Enumerable { element_type } => {
                self.within_branch(expected, node, |t, object| {
                    t.compare_collection(actual, object, node, &element_type, within)
                })
            }
            StrategyDecision::Dictionary { value_type, .. } => {
                self.within_branch(expected, node, |t, object| {
                    t.compare_dictionary(actual, object, node, &value_type, within)
                })
            }
        }
    }

    /// Run `descend` with the expectation object on the visited branch, or
    /// handle the cycle if it is already there
    fn within_branch<F>(&mut self, expected: &Value, node: &NodeInfo, descend: F) -> Result<()>
    where
        F: FnOnce(&mut Self, &ObjectRef) -> Result<()>,
    {
        let Some(object) = expected.as_object() else {
            return Ok(());
        };

        if self.visited.contains(object) {
            tracing::debug!(
                path = %node.path,
                type_name = %object.type_name(),
                depth = self.visited.depth(),
                "cyclic_reference"
            );
            if self.options.cyclic_references() == CyclicReferenceHandling::Throw {
                let rendered = self.renderer.render(expected);
                self.record(Difference::new(
                    DifferenceKind::CyclicReference,
                    node.path.clone(),
                    format!(
                        "Expected {} to be {}, but it contains a cyclic reference.",
                        node.path, rendered
                    ),
                ));
            }
            return Ok(());
        }

        self.visited.enter(object);
        let result = descend(self, object);
        self.visited.exit();
        result
    }

    fn compare_members(
        &mut self,
        actual: &Value,
        expected: &Value,
        expected_object: &ObjectRef,
        node: &NodeInfo,
        members_of: &TypeName,
        within_inclusion: bool,
    ) -> Result<()> {
        let Some(actual_object) = actual.as_object() else {
            self.record_leaf(&node.path, expected, actual);
            return Ok(());
        };
        if actual_object.shape() != PayloadShape::Members {
            self.record_not_attemptable(node, "an object", actual);
            return Ok(());
        }

        let members = self.provider.members(members_of)?;
        for member in members.iter() {
            let child_expected = member.read(expected_object);
            let child = NodeInfo {
                path: node.path.child_member(member.name()),
                declared_type: Some(member.value_type().clone()),
                runtime_type: child_expected.runtime_type(),
                member: Some(member.clone()),
            };
            let selection = select_strategy(
                &child,
                &child_expected,
                within_inclusion,
                self.options,
                self.provider,
            )?;
            if matches!(selection.decision, StrategyDecision::Skip) {
                continue;
            }

            let counterpart = self.provider.find_member(
                actual_object.type_name(),
                member.name(),
                Some(member.value_type()),
            )?;
            match counterpart {
                Some(actual_member) => {
                    let child_actual = actual_member.read(actual_object);
                    self.visit_selected(&child_actual, &child_expected, &child, selection)?;
                }
                None if self.options.excludes_missing_members() => {}
                None => self.record(Difference::new(
                    DifferenceKind::MissingMember,
                    child.path.clone(),
                    format!(
                        "Expectation has member {} that the other object does not have.",
                        child.path
                    ),
                )),
            }
        }
        Ok(())
    }

    pub(super) fn record(&mut self, difference: Difference) {
        tracing::trace!(path = %difference.path, kind = ?difference.kind, "difference_recorded");
        self.differences.push(difference);
    }

    /// "Expected {path} to be {expected}, but found {actual}."
    pub(super) fn record_leaf(&mut self, path: &Path, expected: &Value, actual: &Value) {
        let expected_text = self.renderer.render(expected);
        let actual_text = self.renderer.render(actual);
        self.record(
            Difference::new(
                DifferenceKind::StructuralMismatch,
                path.clone(),
                format!(
                    "Expected {} to be {}, but found {}.",
                    path, expected_text, actual_text
                ),
            )
            .with_values(expected_text, actual_text),
        );
    }

    /// "Expected {path} to be a {noun} with {n} item(s), but found {m}."
    pub(super) fn record_count(&mut self, path: &Path, noun: &str, expected: usize, actual: usize) {
        self.record(
            Difference::new(
                DifferenceKind::CountMismatch,
                path.clone(),
                format!(
                    "Expected {} to be a {} with {} item(s), but found {}.",
                    path, noun, expected, actual
                ),
            )
            .with_values(expected.to_string(), actual.to_string()),
        );
    }

    /// Run one candidate pairing in a scratch scope and return its findings
    pub(super) fn trial(
        &mut self,
        actual: &Value,
        expected: &Value,
        node: &NodeInfo,
        selection: Selection,
    ) -> Result<Vec<Difference>> {
        let outer = std::mem::take(&mut self.differences);
        let result = self.visit_selected(actual, expected, node, selection);
        let found = std::mem::replace(&mut self.differences, outer);
        result.map(|()| found)
    }
}
