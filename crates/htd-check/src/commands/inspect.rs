use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use htd_core::{ErrorInfo, Strictness};
use htd_graph::{decomposition_hash, Decomposition, DecompositionKind};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Decomposition to summarise.
    pub decomposition: PathBuf,
    /// Accept decompositions with waivable defects.
    #[arg(long)]
    pub lenient: bool,
}

/// JSON summary printed by `inspect`.
#[derive(Debug, Serialize)]
pub struct DecompositionSummary {
    pub hash: String,
    pub kind: DecompositionKind,
    pub num_bags: usize,
    pub width: usize,
    pub computed_width: usize,
    pub num_vertices: usize,
    pub num_hyperedges: usize,
    pub root: Option<u32>,
    pub depth: usize,
    pub bags: Vec<BagSummary>,
    pub waived: Vec<ErrorInfo>,
}

#[derive(Debug, Serialize)]
pub struct BagSummary {
    pub id: u32,
    pub parent: Option<u32>,
    pub vertices: Vec<u32>,
    pub labels: Vec<u32>,
}

impl DecompositionSummary {
    pub fn of(decomposition: &Decomposition) -> Self {
        let tree = decomposition.tree();
        let bags = decomposition
            .bags()
            .map(|(id, vertices, labels)| BagSummary {
                id: id.as_raw(),
                parent: tree
                    .parent(id)
                    .filter(|parent| *parent != id)
                    .map(|parent| parent.as_raw()),
                vertices: vertices.iter().map(|v| v.as_raw()).collect(),
                labels: labels.iter().map(|e| e.as_raw()).collect(),
            })
            .collect();
        Self {
            hash: decomposition_hash(decomposition),
            kind: decomposition.kind(),
            num_bags: decomposition.num_bags(),
            width: decomposition.width(),
            computed_width: decomposition.computed_width(),
            num_vertices: decomposition.num_vertices(),
            num_hyperedges: decomposition.num_hyperedges(),
            root: tree.root().map(|root| root.as_raw()),
            depth: tree.depth(),
            bags,
            waived: decomposition.waived().to_vec(),
        }
    }
}

pub fn run(args: &InspectArgs) -> Result<ExitCode, Box<dyn Error>> {
    let strictness = if args.lenient {
        Strictness::Lenient
    } else {
        Strictness::Strict
    };
    let decomposition = Decomposition::from_path(&args.decomposition, strictness)?;
    let summary = DecompositionSummary::of(&decomposition);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(ExitCode::SUCCESS)
}
