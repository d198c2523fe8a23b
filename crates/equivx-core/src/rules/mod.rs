//! Matching rules: options, selectors, and strategy selection.
//!
//! Rules are stored in registration order. Exclusion and custom comparer
//! lookups scan the list top to bottom and the first matching rule of the
//! relevant kind wins. For ordering, any matching `LooseOrder` rule beats
//! every `StrictOrder` rule.

pub mod options;
pub mod profile;
pub mod selector;
pub mod strategy;

use std::fmt;
use std::sync::Arc;

use crate::model::{TypeName, Value};

pub use options::{
    CyclicReferenceHandling, EquivalencyOptions, Inclusion, ReportLimits, TypeSelection,
};
pub use profile::OptionsProfile;
pub use selector::{NodeInfo, NodePredicate, Selector};
pub use strategy::{select_strategy, ComparisonStrategy, Selection, StrategyDecision};

/// A user-supplied equivalence check for one node
pub trait ValueComparer: Send + Sync {
    fn equivalent(&self, actual: &Value, expected: &Value) -> bool;

    /// Short name used in the configuration listing of a failure report
    fn describe(&self) -> String {
        "custom comparer".to_string()
    }
}

impl<F> ValueComparer for F
where
    F: Fn(&Value, &Value) -> bool + Send + Sync,
{
    fn equivalent(&self, actual: &Value, expected: &Value) -> bool {
        self(actual, expected)
    }
}

/// One configured policy
#[derive(Clone)]
pub enum Rule {
    Exclude(Selector),
    Include(Selector),
    CustomComparer {
        selector: Selector,
        /// Type an actual value must be assignable to for the comparer to run
        applicable_type: TypeName,
        comparer: Arc<dyn ValueComparer>,
    },
    StrictOrder(Selector),
    /// Unordered matching; wins over any `StrictOrder` rule for the same node
    LooseOrder(Selector),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Exclude(s) => write!(f, "Exclude({:?})", s),
            Rule::Include(s) => write!(f, "Include({:?})", s),
            Rule::CustomComparer {
                selector,
                applicable_type,
                comparer,
            } => write!(
                f,
                "CustomComparer({:?}, {}, {})",
                selector,
                applicable_type,
                comparer.describe()
            ),
            Rule::StrictOrder(s) => write!(f, "StrictOrder({:?})", s),
            Rule::LooseOrder(s) => write!(f, "LooseOrder({:?})", s),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Exclude(s) => write!(f, "Exclude {}", s),
            Rule::Include(s) => write!(f, "Include {}", s),
            Rule::CustomComparer {
                selector,
                applicable_type,
                comparer,
            } => write!(
                f,
                "Use {} for {} ({})",
                comparer.describe(),
                selector,
                applicable_type
            ),
            Rule::StrictOrder(s) => write!(f, "Compare {} in strict order", s),
            Rule::LooseOrder(s) => write!(f, "Compare {} in any order", s),
        }
    }
}
