use htd_core::errors::{ErrorInfo, HtdError};
use htd_graph::{decomposition_hash, instance_hash, Decomposition, Instance};
use serde::{Deserialize, Serialize};

use crate::engine::validate;
use crate::violation::Violation;
use crate::width::{compare_width, WidthComparison};

/// Serializable outcome of checking one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Canonical hash of the instance.
    pub instance_hash: String,
    /// Canonical hash of the submitted decomposition.
    pub decomposition_hash: String,
    /// Number of bags in the submission.
    pub num_bags: usize,
    /// Declared width of the submission.
    pub width: usize,
    /// First structural violation, `None` when the submission is a valid GHD.
    pub structural: Option<Violation>,
    /// Width comparison against the reference, when one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_comparison: Option<WidthComparison>,
    /// Violations waived while leniently parsing the reference.
    #[serde(default)]
    pub reference_waived: Vec<ErrorInfo>,
}

impl ValidationReport {
    /// Validates `candidate` against `instance` and optionally compares its
    /// width with `reference`.
    pub fn evaluate(
        instance: &Instance,
        candidate: &Decomposition,
        reference: Option<&Decomposition>,
    ) -> Self {
        Self {
            instance_hash: instance_hash(instance),
            decomposition_hash: decomposition_hash(candidate),
            num_bags: candidate.num_bags(),
            width: candidate.width(),
            structural: validate(instance, candidate).err(),
            width_comparison: reference.map(|r| compare_width(candidate.width(), r.width())),
            reference_waived: reference.map(|r| r.waived().to_vec()).unwrap_or_default(),
        }
    }

    /// Returns whether the submission is structurally valid.
    pub fn is_valid(&self) -> bool {
        self.structural.is_none()
    }

    /// Returns the optimality outcome, `None` without a reference.
    pub fn is_optimal(&self) -> Option<bool> {
        self.width_comparison.map(|c| c.is_optimal())
    }

    /// Returns whether the submission is accepted.
    pub fn passed(&self) -> bool {
        self.is_valid() && self.is_optimal().unwrap_or(true)
    }

    /// Returns the violation that decides the verdict.
    ///
    /// Structural failures take precedence over a width failure.
    pub fn first_violation(&self) -> Option<Violation> {
        if let Some(violation) = &self.structural {
            return Some(violation.clone());
        }
        let comparison = self.width_comparison?;
        crate::width::check_width(comparison.candidate, comparison.reference).err()
    }

    /// Serializes the report as pretty printed JSON.
    pub fn to_json_string(&self) -> Result<String, HtdError> {
        serde_json::to_string_pretty(self).map_err(|err| serde_error("json-encode", err))
    }

    /// Restores a report from JSON.
    pub fn from_json_str(text: &str) -> Result<Self, HtdError> {
        serde_json::from_str(text).map_err(|err| serde_error("json-decode", err))
    }
}

fn serde_error(code: &str, err: serde_json::Error) -> HtdError {
    HtdError::Serde(ErrorInfo::new(code, err.to_string()))
}
