//! Structured error types shared across the checker crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HtdError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Input line the error was detected on, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Contextual key value pairs (identifiers, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            line: None,
            context: BTreeMap::new(),
        }
    }

    /// Attaches the input line number to the payload.
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

/// Canonical error type for the checker.
///
/// The families mirror the two grading channels: `Instance` errors are faults
/// in the benchmark's own input and are always fatal, while `Solution` errors
/// describe a defect of a submitted decomposition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HtdError {
    /// Malformed hypergraph instance input.
    #[error("instance error: {0}")]
    Instance(ErrorInfo),
    /// Malformed or inconsistent decomposition.
    #[error("solution error: {0}")]
    Solution(ErrorInfo),
    /// File access failures.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Configuration loading errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if let Some(line) = self.line {
            write!(f, " | line: {line}")?;
        }
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl HtdError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HtdError::Instance(info)
            | HtdError::Solution(info)
            | HtdError::Io(info)
            | HtdError::Config(info)
            | HtdError::Serde(info) => info,
        }
    }

    /// Returns the input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        self.info().line
    }

    /// Returns whether this error belongs to the instance channel.
    pub fn is_instance(&self) -> bool {
        matches!(self, HtdError::Instance(_))
    }

    /// Returns whether this error belongs to the solution channel.
    pub fn is_solution(&self) -> bool {
        matches!(self, HtdError::Solution(_))
    }

    /// Wraps an I/O failure, recording the path that was being accessed.
    pub fn io(err: &std::io::Error, path: impl fmt::Display) -> Self {
        HtdError::Io(ErrorInfo::new("io", err.to_string()).with_context("path", path))
    }
}

/// Builds an instance-channel error.
pub fn instance_error(
    code: impl Into<String>,
    message: impl Into<String>,
    line: Option<usize>,
) -> HtdError {
    HtdError::Instance(ErrorInfo::new(code, message).with_line(line))
}

/// Builds a solution-channel error.
pub fn solution_error(code: impl Into<String>, message: impl Into<String>) -> HtdError {
    HtdError::Solution(ErrorInfo::new(code, message))
}
