use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, ValueEnum};
use htd_core::Strictness;
use htd_graph::{Decomposition, Instance};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Instance,
    Decomposition,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// File to re-emit in canonical form.
    pub input: PathBuf,
    /// Format of the input file.
    #[arg(long, value_enum)]
    pub kind: InputKind,
    /// Accept decompositions with waivable defects.
    #[arg(long)]
    pub lenient: bool,
    /// Destination file; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &NormalizeArgs) -> Result<ExitCode, Box<dyn Error>> {
    let text = match args.kind {
        InputKind::Instance => Instance::from_path(&args.input)?.to_text(),
        InputKind::Decomposition => {
            let strictness = if args.lenient {
                Strictness::Lenient
            } else {
                Strictness::Strict
            };
            Decomposition::from_path(&args.input, strictness)?.to_text()
        }
    };
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
        }
        None => print!("{text}"),
    }
    Ok(ExitCode::SUCCESS)
}
