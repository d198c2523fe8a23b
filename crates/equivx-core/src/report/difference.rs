use serde::Serialize;
use std::fmt;

use crate::model::Path;

/// Classification of a recorded finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceKind {
    /// Values differ at a leaf
    StructuralMismatch,
    /// Collections or dictionaries differ in size
    CountMismatch,
    /// The expectation has a member the subject lacks
    MissingMember,
    /// The expectation has a dictionary key the subject lacks
    MissingKey,
    CyclicReference,
    /// A custom comparer was selected but the subject is of another type
    TypeMismatchInCustomComparer,
    /// The configuration cannot decide how to compare the node
    ConfigurationAmbiguity,
    /// The subject does not have the shape the expectation requires
    NotAttemptable,
}

/// One path-addressed finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub path: Path,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl Difference {
    pub fn new(kind: DifferenceKind, path: Path, message: impl Into<String>) -> Self {
        Self {
            kind,
            path,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    pub fn with_values(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
