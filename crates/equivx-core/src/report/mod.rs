//! Difference records, value rendering, and failure reporting.

pub mod difference;
pub mod render;
pub mod reporter;

pub use difference::{Difference, DifferenceKind};
pub use render::ValueRenderer;
pub use reporter::{
    CollectingReporter, EquivalencyFailure, FailureFormatter, FailureReporter, PanicReporter,
};
