use std::collections::{BTreeSet, VecDeque};
use std::fmt::Write as _;

use htd_core::errors::{ErrorInfo, HtdError};
use htd_core::{BagId, RngHandle, Strictness};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::decomposition::Decomposition;
use crate::instance::Instance;

/// Instance together with a decomposition known to be a valid GHD of it.
#[derive(Debug, Clone)]
pub struct GeneratedCase {
    /// Generated hypergraph.
    pub instance: Instance,
    /// Valid decomposition of [`GeneratedCase::instance`].
    pub decomposition: Decomposition,
}

/// Generates a uniformly relabelled random tree on `num_bags` bags.
///
/// Edges are returned as `(parent, child)` pairs in shuffled order.
pub fn gen_random_tree(num_bags: usize, rng: &mut RngHandle) -> Vec<(BagId, BagId)> {
    let mut order: Vec<BagId> = (0..num_bags).map(BagId::from_index).collect();
    order.shuffle(rng);
    let mut edges: Vec<(BagId, BagId)> = (1..order.len())
        .map(|idx| (order[rng.gen_range(0..idx)], order[idx]))
        .collect();
    edges.shuffle(rng);
    edges
}

/// Generates an instance and a valid decomposition of it.
///
/// Every bag introduces between one and `max_fresh` new vertices and may
/// share some of its parent's fresh vertices. Each bag contributes one
/// hyperedge equal to its vertex set, labels itself with it and sometimes
/// also with its parent's hyperedge, so the width is one or two.
pub fn gen_valid_case(
    num_bags: usize,
    max_fresh: usize,
    rng: &mut RngHandle,
) -> Result<GeneratedCase, HtdError> {
    if num_bags == 0 {
        return Err(HtdError::Solution(ErrorInfo::new(
            "empty-decomposition",
            "generator requires at least one bag",
        )));
    }
    let edges = gen_random_tree(num_bags, rng);
    let mut parent: Vec<Option<BagId>> = vec![None; num_bags];
    let mut children: Vec<Vec<BagId>> = vec![Vec::new(); num_bags];
    for (p, c) in &edges {
        parent[c.index()] = Some(*p);
        children[p.index()].push(*c);
    }
    let root = parent
        .iter()
        .position(Option::is_none)
        .map(BagId::from_index)
        .unwrap_or_else(|| BagId::from_index(0));

    let mut fresh: Vec<Vec<u32>> = vec![Vec::new(); num_bags];
    let mut bags: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); num_bags];
    let mut labels: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); num_bags];
    let mut next_vertex = 1u32;
    let mut queue = VecDeque::from([root]);
    while let Some(bag) = queue.pop_front() {
        let count = rng.gen_range(1..=max_fresh.max(1));
        for _ in 0..count {
            fresh[bag.index()].push(next_vertex);
            bags[bag.index()].insert(next_vertex);
            next_vertex += 1;
        }
        labels[bag.index()].insert(bag.as_raw());
        if let Some(p) = parent[bag.index()] {
            for &shared in &fresh[p.index()] {
                if rng.gen_bool(0.5) {
                    bags[bag.index()].insert(shared);
                }
            }
            if rng.gen_bool(0.5) {
                labels[bag.index()].insert(p.as_raw());
            }
        }
        queue.extend(children[bag.index()].iter().copied());
    }

    let num_vertices = next_vertex - 1;
    let width = labels.iter().map(BTreeSet::len).max().unwrap_or(0);

    let mut instance_text = format!("c generated\np htd {num_vertices} {num_bags}\n");
    for (idx, vertices) in bags.iter().enumerate() {
        let _ = writeln!(instance_text, "{} {}", idx + 1, join(vertices));
    }
    let mut decomposition_text =
        format!("s htd {num_bags} {width} {num_vertices} {num_bags}\n");
    for (p, c) in &edges {
        let _ = writeln!(decomposition_text, "{p} {c}");
    }
    for (idx, vertices) in bags.iter().enumerate() {
        let _ = writeln!(decomposition_text, "b {} {}", idx + 1, join(vertices));
        for edge in &labels[idx] {
            let _ = writeln!(decomposition_text, "w {} {} 1", idx + 1, edge);
        }
    }

    Ok(GeneratedCase {
        instance: Instance::parse_str(&instance_text)?,
        decomposition: Decomposition::parse_str(&decomposition_text, Strictness::Strict)?,
    })
}

/// Generates `count` cases, each from its own substream of `master_seed`.
pub fn gen_case_suite(
    master_seed: u64,
    count: usize,
    num_bags: usize,
    max_fresh: usize,
) -> Result<Vec<GeneratedCase>, HtdError> {
    (0..count as u64)
        .map(|substream| {
            let mut rng = RngHandle::substream(master_seed, substream);
            gen_valid_case(num_bags, max_fresh, &mut rng)
        })
        .collect()
}

fn join(values: &BTreeSet<u32>) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
