use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a vertex of a hypergraph instance (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a new identifier from its raw 1-based representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a zero-based slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the raw 1-based representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the zero-based slot index used by adjacency arrays.
    pub fn index(&self) -> usize {
        self.0.saturating_sub(1) as usize
    }
}

/// Identifier for a hyperedge of a hypergraph instance (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HyperedgeId(u32);

impl HyperedgeId {
    /// Creates a new identifier from its raw 1-based representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a zero-based slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the raw 1-based representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the zero-based slot index used by hyperedge arrays.
    pub fn index(&self) -> usize {
        self.0.saturating_sub(1) as usize
    }
}

/// Identifier for a bag (tree node) of a decomposition (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BagId(u32);

impl BagId {
    /// Creates a new identifier from its raw 1-based representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Creates an identifier from a zero-based slot index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns the raw 1-based representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the zero-based slot index used by bag arrays.
    pub fn index(&self) -> usize {
        self.0.saturating_sub(1) as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HyperedgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
