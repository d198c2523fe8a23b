//! Leaf comparisons: primitive equality and custom comparers.

use crate::engine::traversal::Traversal;
use crate::errors::Result;
use crate::model::{Path, TypeName, Value};
use crate::report::{Difference, DifferenceKind};
use crate::rules::ValueComparer;

impl Traversal<'_> {
    /// Scalars by value, byte sequences element by element in order,
    /// references by identity
    pub(super) fn compare_primitive(&mut self, actual: &Value, expected: &Value, path: &Path) {
        match (actual, expected) {
            (Value::Bytes(actual_bytes), Value::Bytes(expected_bytes)) => {
                self.compare_bytes(actual_bytes, expected_bytes, path)
            }
            _ if actual.scalar_eq(expected) => {}
            _ => self.record_leaf(path, expected, actual),
        }
    }

    /// Reports the count, or the first differing index
    fn compare_bytes(&mut self, actual: &[u8], expected: &[u8], path: &Path) {
        if actual.len() != expected.len() {
            self.record_count(path, "collection", expected.len(), actual.len());
            return;
        }
        if let Some(index) = actual.iter().zip(expected).position(|(a, e)| a != e) {
            self.record_leaf(
                &path.child_index(index),
                &Value::UInt(u64::from(expected[index])),
                &Value::UInt(u64::from(actual[index])),
            );
        }
    }

    pub(super) fn compare_custom(
        &mut self,
        actual: &Value,
        expected: &Value,
        path: &Path,
        applicable_type: &TypeName,
        comparer: &dyn ValueComparer,
    ) -> Result<()> {
        if let Some(actual_type) = actual.runtime_type() {
            if !self.provider.conforms_to(&actual_type, applicable_type)? {
                self.record(Difference::new(
                    DifferenceKind::TypeMismatchInCustomComparer,
                    path.clone(),
                    format!(
                        "Expected {} to be a {}, but found a {}.",
                        path, applicable_type, actual_type
                    ),
                ));
                return Ok(());
            }
        }
        if !comparer.equivalent(actual, expected) {
            self.record_leaf(path, expected, actual);
        }
        Ok(())
    }
}
