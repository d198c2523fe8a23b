//! Branch-scoped visited set for cycle detection.

use crate::model::{ObjectRef, TypeName};

/// The `(identity, type)` pairs on the current root-to-node branch
///
/// Entries are popped on the way back up, so an object that appears under
/// two siblings is not a cycle; only a node that revisits one of its own
/// ancestors is.
#[derive(Debug, Default)]
pub(crate) struct VisitedSet {
    branch: Vec<(usize, TypeName)>,
}

impl VisitedSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, object: &ObjectRef) -> bool {
        let identity = object.identity();
        self.branch
            .iter()
            .any(|(id, type_name)| *id == identity && type_name == object.type_name())
    }

    pub(crate) fn enter(&mut self, object: &ObjectRef) {
        self.branch
            .push((object.identity(), object.type_name().clone()));
    }

    pub(crate) fn exit(&mut self) {
        self.branch.pop();
    }

    pub(crate) fn depth(&self) -> usize {
        self.branch.len()
    }
}
