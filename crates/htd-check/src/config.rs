use std::fs;
use std::path::Path;

use htd_core::errors::{ErrorInfo, HtdError};
use serde::{Deserialize, Serialize};

/// YAML-configurable checker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Wall-clock budget in seconds; also scales the penalty scores.
    #[serde(default = "default_time_budget")]
    pub time_budget_secs: f64,
    /// Print the failing diagnostic instead of `Wrong Answer`.
    #[serde(default)]
    pub verbose: bool,
    /// Glob selecting instance files in batch mode.
    #[serde(default = "default_instance_glob")]
    pub instance_glob: String,
    /// Extension of the solution paired with each instance.
    #[serde(default = "default_solution_extension")]
    pub solution_extension: String,
}

fn default_time_budget() -> f64 {
    1800.0
}

fn default_instance_glob() -> String {
    "*.hgr".to_string()
}

fn default_solution_extension() -> String {
    "htd".to_string()
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: default_time_budget(),
            verbose: false,
            instance_glob: default_instance_glob(),
            solution_extension: default_solution_extension(),
        }
    }
}

impl CheckerConfig {
    /// Loads the configuration from `path`, or the defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, HtdError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents =
            fs::read_to_string(path).map_err(|err| HtdError::io(&err, path.display()))?;
        let config: CheckerConfig = serde_yaml::from_str(&contents).map_err(|err| {
            HtdError::Config(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        config.validated()
    }

    /// Applies command line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        verbose: bool,
        time_budget: Option<f64>,
    ) -> Result<Self, HtdError> {
        self.verbose |= verbose;
        if let Some(budget) = time_budget {
            self.time_budget_secs = budget;
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, HtdError> {
        if !self.time_budget_secs.is_finite() || self.time_budget_secs <= 0.0 {
            return Err(HtdError::Config(
                ErrorInfo::new("time-budget", "time budget must be a positive number of seconds")
                    .with_context("time_budget_secs", self.time_budget_secs),
            ));
        }
        if self.solution_extension.is_empty() {
            return Err(HtdError::Config(ErrorInfo::new(
                "solution-extension",
                "solution extension must not be empty",
            )));
        }
        Ok(self)
    }
}
