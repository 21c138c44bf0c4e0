use sha2::{Digest, Sha256};

use crate::decomposition::Decomposition;
use crate::instance::Instance;

/// Computes the canonical structural hash of a hypergraph instance.
pub fn instance_hash(instance: &Instance) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"instance");
    hasher.update((instance.num_vertices() as u64).to_le_bytes());
    hasher.update((instance.num_hyperedges() as u64).to_le_bytes());
    for (_, vertices) in instance.hyperedges() {
        update_slice(vertices.iter().map(|v| v.as_raw()), vertices.len(), &mut hasher);
    }
    format!("{:x}", hasher.finalize())
}

/// Computes the canonical structural hash of a decomposition.
///
/// Tree edges are hashed as `(parent, child)` pairs of the rooted tree, so two
/// files differing only in edge order or direction hash identically.
pub fn decomposition_hash(decomposition: &Decomposition) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"decomposition");
    let header = decomposition.header();
    hasher.update(header.kind.token().as_bytes());
    for value in [
        header.num_bags,
        header.width,
        header.num_vertices,
        header.num_hyperedges,
    ] {
        hasher.update((value as u64).to_le_bytes());
    }
    let edges = decomposition.tree().parent_edges();
    hasher.update((edges.len() as u64).to_le_bytes());
    for (parent, child) in edges {
        hasher.update(parent.as_raw().to_le_bytes());
        hasher.update(child.as_raw().to_le_bytes());
    }
    for (_, vertices, labels) in decomposition.bags() {
        update_slice(vertices.iter().map(|v| v.as_raw()), vertices.len(), &mut hasher);
        update_slice(labels.iter().map(|e| e.as_raw()), labels.len(), &mut hasher);
    }
    format!("{:x}", hasher.finalize())
}

fn update_slice(values: impl Iterator<Item = u32>, len: usize, hasher: &mut Sha256) {
    hasher.update((len as u64).to_le_bytes());
    for value in values {
        hasher.update(value.to_le_bytes());
    }
}
