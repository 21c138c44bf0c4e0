use serde::{Deserialize, Serialize};

use crate::violation::{Violation, ViolationKind};

/// Declared widths of a candidate and a reference decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthComparison {
    /// Width declared by the submitted decomposition.
    pub candidate: usize,
    /// Width declared by the reference decomposition.
    pub reference: usize,
}

impl WidthComparison {
    /// Returns whether the candidate is at least as narrow as the reference.
    pub fn is_optimal(&self) -> bool {
        self.candidate <= self.reference
    }
}

/// Compares two widths.
pub fn compare_width(candidate: usize, reference: usize) -> WidthComparison {
    WidthComparison {
        candidate,
        reference,
    }
}

/// Fails with [`ViolationKind::NotOptimal`] when `candidate` exceeds `reference`.
pub fn check_width(candidate: usize, reference: usize) -> Result<(), Violation> {
    let comparison = compare_width(candidate, reference);
    if comparison.is_optimal() {
        Ok(())
    } else {
        Err(Violation::new(ViolationKind::NotOptimal)
            .with_witness("candidate", candidate)
            .with_witness("reference", reference))
    }
}
