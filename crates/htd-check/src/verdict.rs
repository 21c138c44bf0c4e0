use std::path::Path;

use htd_core::{HtdError, Strictness};
use htd_graph::{Decomposition, Instance};
use htd_validate::ValidationReport;

use crate::config::CheckerConfig;

/// Outcome printed on stdout as `<score>|<message>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Accepted submission; scored by the reported run time.
    Success {
        /// Reported elapsed time in seconds, zero when not supplied.
        elapsed: f64,
    },
    /// Rejected submission.
    WrongAnswer {
        /// Diagnostic shown only in verbose mode.
        diagnostic: String,
    },
    /// Reported run time exceeded the budget.
    TimeLimitExceeded,
}

impl Verdict {
    /// Score attached to the verdict under `config`.
    pub fn score(&self, config: &CheckerConfig) -> f64 {
        match self {
            Verdict::Success { elapsed } => *elapsed,
            Verdict::WrongAnswer { .. } => -10.0 * config.time_budget_secs,
            Verdict::TimeLimitExceeded => -2.0 * config.time_budget_secs,
        }
    }

    /// Message attached to the verdict under `config`.
    pub fn message<'a>(&'a self, config: &CheckerConfig) -> &'a str {
        match self {
            Verdict::Success { .. } => "SUCCESS",
            Verdict::WrongAnswer { diagnostic } if config.verbose => diagnostic.as_str(),
            Verdict::WrongAnswer { .. } => "Wrong Answer",
            Verdict::TimeLimitExceeded => "Time Limit Exceeded",
        }
    }

    /// Renders the verdict line.
    pub fn render(&self, config: &CheckerConfig) -> String {
        format!("{:.8}|{}", self.score(config), self.message(config))
    }

    /// Returns whether the submission was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success { .. })
    }

    fn wrong_answer(diagnostic: impl Into<String>) -> Self {
        Verdict::WrongAnswer {
            diagnostic: diagnostic.into(),
        }
    }
}

/// Renders an instance-channel failure for stderr.
pub fn render_instance_error(err: &HtdError) -> String {
    let line = err.line().map_or(-1, |line| line as i64);
    format!("Instance Error ({line}): {}", err.info().message)
}

/// Files making up one graded submission.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    /// Hypergraph instance.
    pub instance: &'a Path,
    /// Decomposition produced by the participant.
    pub solution: &'a Path,
    /// Optional reference decomposition for the width comparison.
    pub reference: Option<&'a Path>,
    /// Reported run time in seconds.
    pub elapsed: Option<f64>,
}

/// Verdict together with the report, when the solution could be parsed.
#[derive(Debug, Clone)]
pub struct Judgement {
    /// Final verdict.
    pub verdict: Verdict,
    /// Validation report for the parsed submission.
    pub report: Option<ValidationReport>,
}

impl Judgement {
    fn without_report(verdict: Verdict) -> Self {
        Self {
            verdict,
            report: None,
        }
    }
}

/// Grades a submission.
///
/// Returns `Err` only for failures on the instance channel, which include an
/// unusable reference decomposition.
pub fn judge(submission: &Submission<'_>, config: &CheckerConfig) -> Result<Judgement, HtdError> {
    if let Some(elapsed) = submission.elapsed {
        if elapsed > config.time_budget_secs {
            tracing::info!(elapsed, budget = config.time_budget_secs, "time limit exceeded");
            return Ok(Judgement::without_report(Verdict::TimeLimitExceeded));
        }
    }
    if !submission.solution.is_file() {
        tracing::info!(path = %submission.solution.display(), "solution file missing");
        return Ok(Judgement::without_report(Verdict::wrong_answer(
            "No output produced by user",
        )));
    }

    let instance = Instance::from_path(submission.instance).map_err(into_instance_channel)?;
    let candidate = match Decomposition::from_path(submission.solution, Strictness::Strict) {
        Ok(decomposition) => decomposition,
        Err(err) if err.is_instance() => return Err(err),
        Err(err) => {
            tracing::info!(code = %err.info().code, "solution rejected while parsing");
            return Ok(Judgement::without_report(Verdict::wrong_answer(
                err.info().message.clone(),
            )));
        }
    };
    let reference = submission
        .reference
        .map(|path| Decomposition::from_path(path, Strictness::Lenient))
        .transpose()
        .map_err(into_instance_channel)?;

    let report = ValidationReport::evaluate(&instance, &candidate, reference.as_ref());
    let verdict = match report.first_violation() {
        None => Verdict::Success {
            elapsed: submission.elapsed.unwrap_or(0.0),
        },
        Some(violation) => Verdict::wrong_answer(violation.message()),
    };
    tracing::info!(success = verdict.is_success(), width = report.width, "graded submission");
    Ok(Judgement {
        verdict,
        report: Some(report),
    })
}

fn into_instance_channel(err: HtdError) -> HtdError {
    match err {
        HtdError::Instance(_) => err,
        other => HtdError::Instance(other.info().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_scale_with_budget() {
        let config = CheckerConfig::default();
        assert_eq!(
            Verdict::Success { elapsed: 1.5 }.render(&config),
            "1.50000000|SUCCESS"
        );
        assert_eq!(
            Verdict::TimeLimitExceeded.render(&config),
            "-3600.00000000|Time Limit Exceeded"
        );
        assert_eq!(
            Verdict::wrong_answer("Width differs with header").render(&config),
            "-18000.00000000|Wrong Answer"
        );
    }

    #[test]
    fn verbose_shows_diagnostic() {
        let config = CheckerConfig {
            verbose: true,
            ..CheckerConfig::default()
        };
        assert_eq!(
            Verdict::wrong_answer("Width differs with header").render(&config),
            "-18000.00000000|Width differs with header"
        );
    }

    #[test]
    fn instance_error_without_line_uses_minus_one() {
        let err = htd_core::instance_error("missing-header", "No header found", None);
        assert_eq!(render_instance_error(&err), "Instance Error (-1): No header found");
        let err = htd_core::instance_error("duplicate-edge", "Duplicate hyperedge", Some(4));
        assert_eq!(render_instance_error(&err), "Instance Error (4): Duplicate hyperedge");
    }
}
