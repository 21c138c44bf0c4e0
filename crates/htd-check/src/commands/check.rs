use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

use crate::config::CheckerConfig;
use crate::verdict::{judge, render_instance_error, Submission};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Hypergraph instance file.
    pub instance: PathBuf,
    /// Decomposition produced by the participant.
    pub solution: PathBuf,
    /// Reference decomposition; the submission must not be wider.
    #[arg(long)]
    pub reference: Option<PathBuf>,
    /// Reported run time in seconds.
    #[arg(long)]
    pub elapsed: Option<f64>,
    /// Write the JSON validation report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &CheckArgs, config: &CheckerConfig) -> Result<ExitCode, Box<dyn Error>> {
    let submission = Submission {
        instance: &args.instance,
        solution: &args.solution,
        reference: args.reference.as_deref(),
        elapsed: args.elapsed,
    };
    let judgement = match judge(&submission, config) {
        Ok(judgement) => judgement,
        Err(err) => {
            eprintln!("{}", render_instance_error(&err));
            return Ok(ExitCode::from(2));
        }
    };
    if let (Some(path), Some(report)) = (&args.report, &judgement.report) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, report.to_json_string()?)?;
    }
    println!("{}", judgement.verdict.render(config));
    Ok(ExitCode::SUCCESS)
}
