//! Failure formatting and the reporter seam.

use thiserror::Error;

use crate::errors::EquivError;
use crate::report::difference::Difference;
use crate::rules::{EquivalencyOptions, ReportLimits};

/// A rejected comparison: the formatted report and every finding behind it
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct EquivalencyFailure {
    message: String,
    differences: Vec<Difference>,
}

impl EquivalencyFailure {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn differences(&self) -> &[Difference] {
        &self.differences
    }

    pub fn into_differences(self) -> Vec<Difference> {
        self.differences
    }
}

impl From<EquivalencyFailure> for EquivError {
    fn from(failure: EquivalencyFailure) -> Self {
        EquivError::NotEquivalent {
            difference_count: failure.differences.len(),
            message: failure.message,
        }
    }
}

/// Turns a non-empty difference list into a failure signal
pub trait FailureReporter {
    /// Accept an empty list; raise a failure for anything else
    ///
    /// # Errors
    ///
    /// An [`EquivalencyFailure`] when `differences` is non-empty and the
    /// reporter signals through its return value.
    fn report(
        &self,
        differences: &[Difference],
        because: Option<&str>,
    ) -> Result<(), EquivalencyFailure>;
}

/// Builds the single failure message for a run
#[derive(Debug, Clone)]
pub struct FailureFormatter {
    limits: ReportLimits,
    configuration: String,
}

impl FailureFormatter {
    pub fn for_options(options: &EquivalencyOptions) -> Self {
        Self {
            limits: options.limits(),
            configuration: options.to_string(),
        }
    }

    pub fn format(&self, differences: &[Difference], because: Option<&str>) -> String {
        let mut message = format!(
            "Expected subject to be equivalent to the expectation{}, but found {} difference(s):\n",
            because_clause(because),
            differences.len()
        );
        for difference in differences.iter().take(self.limits.max_differences) {
            message.push_str("- ");
            message.push_str(&difference.message);
            message.push('\n');
        }
        let hidden = differences.len().saturating_sub(self.limits.max_differences);
        if hidden > 0 {
            message.push_str(&format!("- ... and {} more difference(s)\n", hidden));
        }
        message.push_str("With configuration:\n");
        message.push_str(&self.configuration);
        message.trim_end().to_string()
    }

    fn failure(&self, differences: &[Difference], because: Option<&str>) -> EquivalencyFailure {
        EquivalencyFailure {
            message: self.format(differences, because),
            differences: differences.to_vec(),
        }
    }
}

fn because_clause(because: Option<&str>) -> String {
    match because.map(str::trim) {
        None | Some("") => String::new(),
        Some(reason) if reason.starts_with("because") => format!(" {}", reason),
        Some(reason) => format!(" because {}", reason),
    }
}

/// Raises failures by panicking, the conventional test-failure signal
#[derive(Debug, Clone)]
pub struct PanicReporter {
    formatter: FailureFormatter,
}

impl PanicReporter {
    pub fn for_options(options: &EquivalencyOptions) -> Self {
        Self {
            formatter: FailureFormatter::for_options(options),
        }
    }
}

impl FailureReporter for PanicReporter {
    fn report(
        &self,
        differences: &[Difference],
        because: Option<&str>,
    ) -> Result<(), EquivalencyFailure> {
        if differences.is_empty() {
            return Ok(());
        }
        panic!("{}", self.formatter.format(differences, because));
    }
}

/// Returns failures as error values
#[derive(Debug, Clone)]
pub struct CollectingReporter {
    formatter: FailureFormatter,
}

impl CollectingReporter {
    pub fn for_options(options: &EquivalencyOptions) -> Self {
        Self {
            formatter: FailureFormatter::for_options(options),
        }
    }
}

impl FailureReporter for CollectingReporter {
    fn report(
        &self,
        differences: &[Difference],
        because: Option<&str>,
    ) -> Result<(), EquivalencyFailure> {
        if differences.is_empty() {
            return Ok(());
        }
        Err(self.formatter.failure(differences, because))
    }
}
