//! Core types shared across EquivX facilities
//!
//! This crate provides foundational types used by both the comparison
//! engine and its logging facility:
//!
//! - **Correlation types**: RunId, RunContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RunContext, RunId};
