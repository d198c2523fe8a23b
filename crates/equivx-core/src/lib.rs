//! EquivX Core - Deep structural equivalence of object graphs
//!
//! This crate decides whether two object graphs are equivalent under a
//! configurable policy and, if not, describes every difference by path
//! (e.g. `Customers[1].Address.City`). It provides:
//! - A dynamic object model with shared, identity-bearing nodes
//! - A member catalog standing in for runtime reflection
//! - Ordered matching rules: exclusions, inclusions, custom comparers,
//!   strict-ordering overrides
//! - The traversal engine with cycle detection and closest-match pairing of
//!   unordered collections
//! - Failure formatting and reporting
//!
//! ```
//! use equivx_core::{compare, EquivalencyOptions, ObjectRef, TypeCatalog, TypeDescriptor};
//!
//! let catalog = TypeCatalog::new().with_type(
//!     TypeDescriptor::class("Customer")
//!         .property("Name", "string")
//!         .property("Age", "i64"),
//! )?;
//! let actual = ObjectRef::instance("Customer").with("Name", "Jane").with("Age", 24);
//! let expected = ObjectRef::instance("Customer").with("Name", "Jane").with("Age", 30);
//!
//! let differences = compare(
//!     &actual.into(),
//!     &expected.into(),
//!     &EquivalencyOptions::new(),
//!     &catalog,
//! )?;
//! assert_eq!(differences[0].message, "Expected Age to be 30, but found 24.");
//! # Ok::<(), equivx_core::EquivError>(())
//! ```

pub mod catalog;
pub mod engine;
pub mod errors;
pub mod json;
pub mod logging_facility;
pub mod model;
pub mod report;
pub mod rules;

// Re-export commonly used types
pub use catalog::{MemberProvider, TypeCatalog, TypeDescriptor};
pub use engine::{assert_equivalent, compare, compare_in, Equivalency};
pub use errors::{EquivError, ExError, ExErrorKind, Result};
pub use model::{ObjectRef, Path, PathPattern, TypeName, Value};
pub use report::{Difference, DifferenceKind, EquivalencyFailure, FailureReporter};
pub use rules::{EquivalencyOptions, OptionsProfile};
