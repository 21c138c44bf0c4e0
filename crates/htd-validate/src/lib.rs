#![deny(missing_docs)]
//! Validation engine for generalized hypertree decompositions.
//!
//! [`validate`] decides whether a parsed decomposition is a GHD of a parsed
//! instance. Width optimality against a reference is checked separately by
//! [`check_width`], and [`ValidationReport`] bundles both outcomes with the
//! canonical hashes of the inputs.

mod engine;
mod report;
mod violation;
mod width;

pub use engine::{
    check_descendant_condition, check_header, check_hyperedge_coverage, check_label_coverage,
    validate,
};
pub use report::ValidationReport;
pub use violation::{Violation, ViolationKind};
pub use width::{check_width, compare_width, WidthComparison};
