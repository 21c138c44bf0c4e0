use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use globset::{Glob, GlobMatcher};
use htd_core::errors::{ErrorInfo, HtdError};
use walkdir::WalkDir;

use crate::config::CheckerConfig;
use crate::verdict::{judge, render_instance_error, Submission};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for instances.
    pub dir: PathBuf,
    /// Override the configured instance glob.
    #[arg(long)]
    pub glob: Option<String>,
}

/// Instance file and the solution expected next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub instance: PathBuf,
    pub solution: PathBuf,
}

pub fn run(args: &BatchArgs, config: &CheckerConfig) -> Result<ExitCode, Box<dyn Error>> {
    let pattern = args.glob.as_deref().unwrap_or(&config.instance_glob);
    let pairs = collect_pairs(&args.dir, pattern, &config.solution_extension)?;
    let mut accepted = 0usize;
    let mut instance_failures = 0usize;
    for pair in &pairs {
        let label = display_path(&args.dir, &pair.instance);
        let submission = Submission {
            instance: &pair.instance,
            solution: &pair.solution,
            reference: None,
            elapsed: None,
        };
        match judge(&submission, config) {
            Ok(judgement) => {
                if judgement.verdict.is_success() {
                    accepted += 1;
                }
                println!("{label}\t{}", judgement.verdict.render(config));
            }
            Err(err) => {
                instance_failures += 1;
                eprintln!("{label}\t{}", render_instance_error(&err));
            }
        }
    }
    tracing::info!(
        pairs = pairs.len(),
        accepted,
        instance_failures,
        "batch finished"
    );
    if instance_failures > 0 {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Finds instances under `dir` matching `pattern`, in file name order.
pub fn collect_pairs(dir: &Path, pattern: &str, extension: &str) -> Result<Vec<Pair>, HtdError> {
    if !dir.is_dir() {
        return Err(HtdError::Config(
            ErrorInfo::new("batch-dir", "batch root is not a directory")
                .with_context("path", dir.display()),
        ));
    }
    let matcher = build_matcher(pattern)?;
    let mut pairs = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        if !matcher.is_match(rel) {
            continue;
        }
        pairs.push(Pair {
            instance: entry.path().to_path_buf(),
            solution: entry.path().with_extension(extension),
        });
    }
    Ok(pairs)
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher, HtdError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| {
            HtdError::Config(
                ErrorInfo::new("instance-glob", err.to_string()).with_context("pattern", pattern),
            )
        })
}

fn display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
