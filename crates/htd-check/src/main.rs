use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{
    batch::{self, BatchArgs},
    check::{self, CheckArgs},
    inspect::{self, InspectArgs},
    normalize::{self, NormalizeArgs},
};
use config::CheckerConfig;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod verdict;

#[derive(Parser, Debug)]
#[command(
    name = "htd-check",
    about = "Generalized hypertree decomposition checker"
)]
struct Cli {
    /// YAML checker configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print the failing diagnostic instead of `Wrong Answer`.
    #[arg(long, global = true)]
    verbose: bool,
    /// Time budget in seconds.
    #[arg(long, global = true)]
    time_budget: Option<f64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Grade one submission against its instance.
    Check(CheckArgs),
    /// Grade every instance/solution pair under a directory.
    Batch(BatchArgs),
    /// Re-emit an instance or decomposition in canonical form.
    Normalize(NormalizeArgs),
    /// Print a JSON summary of a decomposition.
    Inspect(InspectArgs),
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("htd_check=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CheckerConfig::load(cli.config.as_deref())?
        .with_overrides(cli.verbose, cli.time_budget)?;
    match cli.command {
        Command::Check(args) => check::run(&args, &config),
        Command::Batch(args) => batch::run(&args, &config),
        Command::Normalize(args) => normalize::run(&args),
        Command::Inspect(args) => inspect::run(&args),
    }
}
