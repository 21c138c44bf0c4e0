#![deny(missing_docs)]
//! Shared building blocks for the hypertree decomposition checker: the error
//! surface, typed identifiers, the strictness gate and the line tokenizer.

pub mod errors;
mod ids;
pub mod rng;
pub mod strictness;
pub mod token;

pub use errors::{instance_error, solution_error, ErrorInfo, HtdError};
pub use ids::{BagId, HyperedgeId, VertexId};
pub use rng::{derive_substream_seed, RngHandle};
pub use strictness::{ConstraintGate, Strictness};
pub use token::{is_skippable, parse_int, tokenize, ParseMode};
