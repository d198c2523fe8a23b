//! Collection and dictionary matching.
//!
//! Ordered collections compare index by index. Unordered collections are
//! matched as multisets: every expectation element is tried against every
//! subject element in a scratch scope, a perfect pairing over the
//! zero-difference candidates is searched with augmenting paths, and any
//! expectation element left over is reported against its closest remaining
//! candidate.

use crate::engine::traversal::Traversal;
use crate::errors::Result;
use crate::model::{ObjectRef, TypeName, Value};
use crate::report::{Difference, DifferenceKind};
use crate::rules::{select_strategy, NodeInfo, StrategyDecision};

impl Traversal<'_> {
    pub(super) fn compare_collection(
        &mut self,
        actual: &Value,
        expected_object: &ObjectRef,
        node: &NodeInfo,
        element_type: &TypeName,
        within_inclusion: bool,
    ) -> Result<()> {
        let expected_items = expected_object.items().unwrap_or_default();
        let Some(actual_items) = actual.as_object().and_then(ObjectRef::items) else {
            self.record_not_attemptable(node, "a collection", actual);
            return Ok(());
        };
        if actual_items.len() != expected_items.len() {
            self.record_count(&node.path, "collection", expected_items.len(), actual_items.len());
            return Ok(());
        }

        let element = |index: usize| NodeInfo {
            path: node.path.child_index(index),
            declared_type: Some(element_type.clone()),
            runtime_type: expected_items[index].runtime_type(),
            member: None,
        };

        if self.options.is_strictly_ordered(node, self.provider)? {
            for (index, (actual_item, expected_item)) in
                actual_items.iter().zip(&expected_items).enumerate()
            {
                self.visit(actual_item, expected_item, &element(index), within_inclusion)?;
            }
            return Ok(());
        }

        tracing::trace!(
            path = %node.path,
            element_count = expected_items.len(),
            "unordered_match"
        );
        let mut trials: Vec<Vec<Vec<Difference>>> = Vec::with_capacity(expected_items.len());
        for (index, expected_item) in expected_items.iter().enumerate() {
            let child = element(index);
            let selection =
                select_strategy(&child, expected_item, within_inclusion, self.options, self.provider)?;
            if matches!(selection.decision, StrategyDecision::Skip) {
                trials.push(vec![Vec::new(); actual_items.len()]);
                continue;
            }
            let mut row = Vec::with_capacity(actual_items.len());
            for actual_item in &actual_items {
                row.push(self.trial(actual_item, expected_item, &child, selection.clone())?);
            }
            trials.push(row);
        }

        let costs: Vec<Vec<usize>> = trials
            .iter()
            .map(|row| row.iter().map(Vec::len).collect())
            .collect();
        for (expected_index, actual_index) in closest_match(&costs).into_iter().enumerate() {
            let found = std::mem::take(&mut trials[expected_index][actual_index]);
            self.differences.extend(found);
        }
        Ok(())
    }

    pub(super) fn compare_dictionary(
        &mut self,
        actual: &Value,
        expected_object: &ObjectRef,
        node: &NodeInfo,
        value_type: &TypeName,
        within_inclusion: bool,
    ) -> Result<()> {
        let expected_entries = expected_object.entries().unwrap_or_default();
        let Some(actual_entries) = actual.as_object().and_then(ObjectRef::entries) else {
            self.record_not_attemptable(node, "a dictionary", actual);
            return Ok(());
        };
        if actual_entries.len() != expected_entries.len() {
            self.record_count(
                &node.path,
                "dictionary",
                expected_entries.len(),
                actual_entries.len(),
            );
            return Ok(());
        }

        for (key, expected_value) in &expected_entries {
            match actual_entries.iter().find(|(k, _)| k.key_eq(key)) {
                Some((_, actual_value)) => {
                    let child = NodeInfo {
                        path: node.path.child_key(self.renderer.render_key(key)),
                        declared_type: Some(value_type.clone()),
                        runtime_type: expected_value.runtime_type(),
                        member: None,
                    };
                    self.visit(actual_value, expected_value, &child, within_inclusion)?;
                }
                None => {
                    let rendered = self.renderer.render(key);
                    self.record(Difference::new(
                        DifferenceKind::MissingKey,
                        node.path.clone(),
                        format!("Expected {} to contain key {}.", node.path, rendered),
                    ));
                }
            }
        }
        Ok(())
    }

    /// "Expected {path} to be {shape}, but found {actual}."
    pub(super) fn record_not_attemptable(&mut self, node: &NodeInfo, shape: &str, actual: &Value) {
        let rendered = self.renderer.render(actual);
        self.record(
            Difference::new(
                DifferenceKind::NotAttemptable,
                node.path.clone(),
                format!("Expected {} to be {}, but found {}.", node.path, shape, rendered),
            )
            .with_values(shape, rendered.clone()),
        );
    }
}

/// Pick a subject index for every expectation index from a square matrix of
/// difference counts.
///
/// Zero-cost pairs are matched first as a maximum bipartite matching
/// (augmenting paths, expectation order, lowest subject index first). Each
/// expectation left unmatched then takes the still-unpaired subject element
/// with the fewest differences; ties go to the lowest index.
pub(crate) fn closest_match(costs: &[Vec<usize>]) -> Vec<usize> {
    let width = costs.first().map_or(0, Vec::len);
    let mut owner: Vec<Option<usize>> = vec![None; width];

    for expected_index in 0..costs.len() {
        let mut seen = vec![false; width];
        augment(expected_index, costs, &mut owner, &mut seen);
    }

    let mut assigned: Vec<Option<usize>> = vec![None; costs.len()];
    for (actual_index, slot) in owner.iter().enumerate() {
        if let Some(expected_index) = slot {
            assigned[*expected_index] = Some(actual_index);
        }
    }

    let mut paired: Vec<bool> = owner.iter().map(Option::is_some).collect();
    assigned
        .iter()
        .enumerate()
        .map(|(expected_index, slot)| match slot {
            Some(actual_index) => *actual_index,
            None => {
                let best = (0..width)
                    .filter(|j| !paired[*j])
                    .min_by_key(|j| costs[expected_index][*j])
                    .unwrap_or(0);
                if let Some(flag) = paired.get_mut(best) {
                    *flag = true;
                }
                best
            }
        })
        .collect()
}

fn augment(
    expected_index: usize,
    costs: &[Vec<usize>],
    owner: &mut [Option<usize>],
    seen: &mut [bool],
) -> bool {
    for actual_index in 0..owner.len() {
        if costs[expected_index][actual_index] != 0 || seen[actual_index] {
            continue;
        }
        seen[actual_index] = true;
        let free = match owner[actual_index] {
            None => true,
            Some(other) => augment(other, costs, owner, seen),
        };
        if free {
            owner[actual_index] = Some(expected_index);
            return true;
        }
    }
    false
}
