//! Equivalency traversal engine.
//!
//! The core entry point is [`compare`], which walks the expectation graph
//! under an [`EquivalencyOptions`] policy and returns every difference in
//! traversal order. [`Equivalency`] bundles a provider with options and
//! routes the result to a [`FailureReporter`].

mod collection;
mod cycle;
mod primitive;
mod traversal;

use std::time::Instant;

use equivx_core_types::RunContext;

use crate::catalog::MemberProvider;
use crate::errors::{EquivError, ExError, Result};
use crate::model::Value;
use crate::report::{CollectingReporter, Difference, FailureReporter, PanicReporter};
use crate::rules::{EquivalencyOptions, NodeInfo};
use crate::{log_op_end, log_op_error, log_op_start};

use traversal::Traversal;

/// Compare `actual` against `expected`.
///
/// An empty result means the graphs are equivalent. Findings never abort
/// the run; only introspection failures do.
///
/// # Errors
///
/// - `UnknownType` if a type reached during traversal is not known to the
///   provider
pub fn compare(
    actual: &Value,
    expected: &Value,
    options: &EquivalencyOptions,
    provider: &dyn MemberProvider,
) -> Result<Vec<Difference>> {
    compare_in(&RunContext::new(), actual, expected, options, provider)
}

/// [`compare`] under a caller-supplied run context, so log events can be
/// correlated with the caller's own
///
/// # Errors
///
/// As for [`compare`].
pub fn compare_in(
    ctx: &RunContext,
    actual: &Value,
    expected: &Value,
    options: &EquivalencyOptions,
    provider: &dyn MemberProvider,
) -> Result<Vec<Difference>> {
    let start = Instant::now();
    log_op_start!("compare", run_id = %ctx.run_id, label = ctx.label.as_deref().unwrap_or(""));

    let root = NodeInfo::root(options.root_type().cloned(), expected.runtime_type());
    let mut traversal = Traversal::new(options, provider);
    let outcome = traversal.visit(actual, expected, &root, false);
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            let differences = traversal.into_differences();
            log_op_end!(
                "compare",
                duration_ms = duration_ms,
                run_id = %ctx.run_id,
                difference_count = differences.len()
            );
            Ok(differences)
        }
        Err(err) => {
            log_op_error!("compare", err.clone(), duration_ms = duration_ms, run_id = %ctx.run_id);
            Err(err)
        }
    }
}

/// Compare and panic with the formatted report on any difference
///
/// # Panics
///
/// If the graphs are not equivalent, or the comparison itself fails.
pub fn assert_equivalent(
    actual: &Value,
    expected: &Value,
    options: &EquivalencyOptions,
    provider: &dyn MemberProvider,
    because: Option<&str>,
) {
    Equivalency::new(provider)
        .with_options(options.clone())
        .assert_equivalent(actual, expected, because);
}

/// A provider and an options set, ready to compare values
pub struct Equivalency<'p> {
    provider: &'p dyn MemberProvider,
    options: EquivalencyOptions,
}

impl<'p> Equivalency<'p> {
    pub fn new(provider: &'p dyn MemberProvider) -> Self {
        Self {
            provider,
            options: EquivalencyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: EquivalencyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EquivalencyOptions {
        &self.options
    }

    /// # Errors
    ///
    /// As for [`compare`].
    pub fn compare(&self, actual: &Value, expected: &Value) -> Result<Vec<Difference>> {
        compare(actual, expected, &self.options, self.provider)
    }

    /// Compare and hand the differences to `reporter`
    ///
    /// # Errors
    ///
    /// Introspection failures, or `NotEquivalent` when the reporter rejects
    /// the differences.
    pub fn report_with(
        &self,
        reporter: &dyn FailureReporter,
        actual: &Value,
        expected: &Value,
        because: Option<&str>,
    ) -> Result<()> {
        let differences = self.compare(actual, expected)?;
        reporter.report(&differences, because)?;
        Ok(())
    }

    /// Compare and return the formatted failure as an error
    ///
    /// # Errors
    ///
    /// `NotEquivalent` carrying the formatted report, or an introspection
    /// failure.
    pub fn verify(&self, actual: &Value, expected: &Value, because: Option<&str>) -> Result<()> {
        self.report_with(
            &CollectingReporter::for_options(&self.options),
            actual,
            expected,
            because,
        )
    }

    /// # Panics
    ///
    /// If the graphs are not equivalent, or the comparison itself fails.
    pub fn assert_equivalent(&self, actual: &Value, expected: &Value, because: Option<&str>) {
        let reporter = PanicReporter::for_options(&self.options);
        if let Err(err) = self.report_with(&reporter, actual, expected, because) {
            panic!("{}", describe_fatal(err));
        }
    }
}

fn describe_fatal(err: EquivError) -> String {
    ExError::from(err).with_op("assert_equivalent").to_string()
}
