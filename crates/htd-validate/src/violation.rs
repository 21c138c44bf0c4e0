use std::collections::BTreeMap;

use htd_core::errors::{ErrorInfo, HtdError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Condition that a decomposition failed against its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Header vertex counts disagree.
    VertexCountMismatch,
    /// Header hyperedge counts disagree.
    HyperedgeCountMismatch,
    /// Some hyperedge is not contained in any single bag.
    HyperedgeNotCovered,
    /// Some bag is not covered by the union of its labeled hyperedges.
    BagNotCovered,
    /// A labeled hyperedge leaks vertices into the bag's subtree.
    DescendantCondition,
    /// Declared width exceeds the reference width.
    NotOptimal,
}

impl ViolationKind {
    /// Returns the fixed diagnostic message for this condition.
    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::VertexCountMismatch => "Number of vertex from header differs",
            ViolationKind::HyperedgeCountMismatch => "Number of hyperedge from header differs",
            ViolationKind::HyperedgeNotCovered => "Not all hyperedge is a subset of some bag",
            ViolationKind::BagNotCovered => "Not all bags are covered by width function",
            ViolationKind::DescendantCondition => "Not all descendant condition satisfied",
            ViolationKind::NotOptimal => "Reported hypertree decomposition is not optimal",
        }
    }

    /// Returns the stable machine readable code for this condition.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::VertexCountMismatch => "vertex-count-mismatch",
            ViolationKind::HyperedgeCountMismatch => "hyperedge-count-mismatch",
            ViolationKind::HyperedgeNotCovered => "hyperedge-not-covered",
            ViolationKind::BagNotCovered => "bag-not-covered",
            ViolationKind::DescendantCondition => "descendant-condition",
            ViolationKind::NotOptimal => "not-optimal",
        }
    }
}

/// First failing condition found by the engine, with a witness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{}", .kind.message())]
pub struct Violation {
    /// Condition that failed.
    pub kind: ViolationKind,
    /// Witness identifiers (bag, hyperedge, vertex, counts).
    #[serde(default)]
    pub witness: BTreeMap<String, String>,
}

impl Violation {
    /// Creates a violation without witness data.
    pub fn new(kind: ViolationKind) -> Self {
        Self {
            kind,
            witness: BTreeMap::new(),
        }
    }

    /// Adds a witness entry.
    pub fn with_witness(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.witness.insert(key.into(), value.to_string());
        self
    }

    /// Returns the fixed diagnostic message.
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl From<Violation> for HtdError {
    fn from(violation: Violation) -> Self {
        let mut info = ErrorInfo::new(violation.kind.code(), violation.kind.message());
        info.context = violation.witness;
        HtdError::Solution(info)
    }
}
