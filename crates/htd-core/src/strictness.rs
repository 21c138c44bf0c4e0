//! Explicit strictness policy for decomposition checks.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HtdError};

/// Whether solution-context violations abort a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// The first violation aborts with an error.
    #[default]
    Strict,
    /// Violations are logged and recorded, and the offending record skipped.
    Lenient,
}

/// Applies a [`Strictness`] policy to individual constraint checks.
///
/// In lenient mode every waived violation is kept so callers can surface them
/// (the checker attaches them to its JSON report for reference solutions).
#[derive(Debug, Clone)]
pub struct ConstraintGate {
    strictness: Strictness,
    waived: Vec<ErrorInfo>,
}

impl ConstraintGate {
    /// Creates a gate applying the provided policy.
    pub fn new(strictness: Strictness) -> Self {
        Self {
            strictness,
            waived: Vec::new(),
        }
    }

    /// Returns the policy applied by this gate.
    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Checks a constraint.
    ///
    /// Returns `Ok(true)` when it holds, `Ok(false)` when it was violated but
    /// waived, and an error when it was violated under the strict policy.
    pub fn require(&mut self, holds: bool, code: &str, message: &str) -> Result<bool, HtdError> {
        if holds {
            return Ok(true);
        }
        self.reject(HtdError::Solution(ErrorInfo::new(code, message)))?;
        Ok(false)
    }

    /// Checks a constraint, building a detailed payload only on violation.
    pub fn require_with(
        &mut self,
        holds: bool,
        info: impl FnOnce() -> ErrorInfo,
    ) -> Result<bool, HtdError> {
        if holds {
            return Ok(true);
        }
        self.reject(HtdError::Solution(info()))?;
        Ok(false)
    }

    /// Routes an already built error through the policy.
    ///
    /// Only solution-context errors can be waived; every other family is
    /// propagated unchanged.
    pub fn reject(&mut self, err: HtdError) -> Result<(), HtdError> {
        match (self.strictness, err) {
            (Strictness::Lenient, HtdError::Solution(info)) => {
                tracing::warn!(
                    code = %info.code,
                    "waived decomposition violation: {}",
                    info.message
                );
                self.waived.push(info);
                Ok(())
            }
            (_, err) => Err(err),
        }
    }

    /// Returns the violations waived so far.
    pub fn waived(&self) -> &[ErrorInfo] {
        &self.waived
    }

    /// Consumes the gate, returning the waived violations.
    pub fn into_waived(self) -> Vec<ErrorInfo> {
        self.waived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::instance_error;

    #[test]
    fn strict_gate_fails_fast() {
        let mut gate = ConstraintGate::new(Strictness::Strict);
        assert!(gate.require(true, "ok", "fine").unwrap());
        let err = gate.require(false, "bad", "Broken").unwrap_err();
        assert_eq!(err.info().message, "Broken");
        assert!(gate.waived().is_empty());
    }

    #[test]
    fn lenient_gate_records_violations() {
        let mut gate = ConstraintGate::new(Strictness::Lenient);
        assert!(!gate.require(false, "bad", "Broken").unwrap());
        assert!(!gate.require(false, "worse", "Very broken").unwrap());
        let waived = gate.into_waived();
        assert_eq!(waived.len(), 2);
        assert_eq!(waived[1].code, "worse");
    }

    #[test]
    fn lenient_gate_never_waives_instance_errors() {
        let mut gate = ConstraintGate::new(Strictness::Lenient);
        let err = gate
            .reject(instance_error("x", "instance fault", Some(3)))
            .unwrap_err();
        assert!(err.is_instance());
    }
}
