use std::collections::BTreeSet;

use htd_core::errors::{ErrorInfo, HtdError};
use htd_core::BagId;

/// Outcome of [`DecompositionTree::make_rooted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSelection {
    /// Bags that are never the target of a declared edge, in scan order.
    pub candidates: Vec<BagId>,
    /// Selected root: the last candidate encountered.
    pub root: Option<BagId>,
}

impl RootSelection {
    /// Returns whether exactly one root candidate exists.
    pub fn is_unique(&self) -> bool {
        self.candidates.len() == 1
    }
}

/// Undirected tree over bag indices, with the declared edge directions kept
/// as rooting hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionTree {
    adjacency: Vec<Vec<BagId>>,
    declared: Vec<(BagId, BagId)>,
    parent: Vec<Option<BagId>>,
    root: Option<BagId>,
}

impl DecompositionTree {
    /// Creates a tree over `num_bags` isolated bags.
    pub fn new(num_bags: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); num_bags],
            declared: Vec::new(),
            parent: vec![None; num_bags],
            root: None,
        }
    }

    /// Returns the number of bags.
    pub fn num_bags(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges added so far.
    pub fn num_edges(&self) -> usize {
        self.declared.len()
    }

    /// Adds the undirected edge `{u, v}` together with the hint `u -> v`.
    pub fn add_edge(&mut self, u: BagId, v: BagId) -> Result<(), HtdError> {
        self.ensure_bag(u)?;
        self.ensure_bag(v)?;
        self.adjacency[u.index()].push(v);
        self.adjacency[v.index()].push(u);
        self.declared.push((u, v));
        Ok(())
    }

    /// Selects a root from the declared directions and assigns parents.
    ///
    /// Bags unreachable from the root keep no parent. Any previous rooting is
    /// discarded.
    pub fn make_rooted(&mut self) -> RootSelection {
        let mut has_parent = vec![false; self.num_bags()];
        for (_, target) in &self.declared {
            has_parent[target.index()] = true;
        }
        let candidates: Vec<BagId> = has_parent
            .iter()
            .enumerate()
            .filter(|(_, flag)| !**flag)
            .map(|(idx, _)| BagId::from_index(idx))
            .collect();
        let root = candidates.last().copied();

        self.parent = vec![None; self.num_bags()];
        self.root = root;
        if let Some(root) = root {
            self.parent[root.index()] = Some(root);
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                for &next in &self.adjacency[node.index()] {
                    if self.parent[next.index()].is_some() {
                        continue;
                    }
                    self.parent[next.index()] = Some(node);
                    stack.push(next);
                }
            }
        }
        RootSelection { candidates, root }
    }

    /// Returns the selected root, once rooted.
    pub fn root(&self) -> Option<BagId> {
        self.root
    }

    /// Returns the parent of a bag; the root is its own parent.
    pub fn parent(&self, bag: BagId) -> Option<BagId> {
        self.parent.get(bag.index()).copied().flatten()
    }

    /// Returns the neighbours of a bag in insertion order.
    pub fn neighbours(&self, bag: BagId) -> &[BagId] {
        self.adjacency
            .get(bag.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the children of a bag under the current rooting.
    pub fn children(&self, bag: BagId) -> Vec<BagId> {
        self.neighbours(bag)
            .iter()
            .copied()
            .filter(|next| *next != bag && self.parent(*next) == Some(bag))
            .collect()
    }

    /// Returns `(parent, child)` for every non-root bag in bag order.
    pub fn parent_edges(&self) -> Vec<(BagId, BagId)> {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(idx, parent)| {
                let child = BagId::from_index(idx);
                match parent {
                    Some(parent) if *parent != child => Some((*parent, child)),
                    _ => None,
                }
            })
            .collect()
    }

    fn is_rooted(&self) -> bool {
        !self.parent.is_empty() && self.parent.iter().all(Option::is_some)
    }

    /// Returns whether the structure is a valid rooted tree.
    pub fn is_valid_tree(&self) -> bool {
        let all: Vec<BagId> = (0..self.num_bags()).map(BagId::from_index).collect();
        self.is_rooted()
            && self.num_edges() + 1 == self.num_bags()
            && self.is_connected_component(&all)
    }

    /// Returns whether `subset` induces a connected subgraph.
    ///
    /// Counts the edges with both endpoints inside the subset; on a tree the
    /// induced forest is connected exactly when that count is `|subset| - 1`.
    pub fn is_connected_component(&self, subset: &[BagId]) -> bool {
        let members: BTreeSet<BagId> = subset.iter().copied().collect();
        let mut endpoints = 0usize;
        for bag in &members {
            endpoints += self
                .neighbours(*bag)
                .iter()
                .filter(|next| members.contains(*next))
                .count();
        }
        (endpoints / 2) as i64 == members.len() as i64 - 1
    }

    /// Returns `root` followed by all of its descendants in pre-order.
    pub fn subtree(&self, root: BagId) -> Vec<BagId> {
        let mut visited = vec![false; self.num_bags()];
        let mut result = Vec::new();
        if root.index() >= self.num_bags() || root.as_raw() == 0 {
            return result;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if std::mem::replace(&mut visited[node.index()], true) {
                continue;
            }
            result.push(node);
            let parent = self.parent(node);
            for &next in self.neighbours(node).iter().rev() {
                if Some(next) == parent || visited[next.index()] {
                    continue;
                }
                stack.push(next);
            }
        }
        result
    }

    /// Returns the number of bags on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut best = 0;
        let mut stack = vec![(root, 1usize)];
        let mut visited = vec![false; self.num_bags()];
        while let Some((node, level)) = stack.pop() {
            if std::mem::replace(&mut visited[node.index()], true) {
                continue;
            }
            best = best.max(level);
            for child in self.children(node) {
                stack.push((child, level + 1));
            }
        }
        best
    }

    fn ensure_bag(&self, bag: BagId) -> Result<(), HtdError> {
        if bag.as_raw() >= 1 && bag.index() < self.num_bags() {
            Ok(())
        } else {
            Err(HtdError::Solution(
                ErrorInfo::new("unknown-bag", "bag does not exist")
                    .with_context("bag", bag)
                    .with_context("num_bags", self.num_bags()),
            ))
        }
    }
}
