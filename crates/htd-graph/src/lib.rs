#![deny(missing_docs)]
//! Hypergraph instances, decomposition trees and generalized hypertree
//! decompositions, with their text formats.

mod decomposition;
mod generators;
mod hash;
mod instance;
mod tree;

pub use decomposition::{Decomposition, DecompositionHeader, DecompositionKind};
pub use generators::{gen_case_suite, gen_random_tree, gen_valid_case, GeneratedCase};
pub use hash::{decomposition_hash, instance_hash};
pub use instance::Instance;
pub use tree::{DecompositionTree, RootSelection};
