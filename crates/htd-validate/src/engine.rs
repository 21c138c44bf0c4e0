use std::collections::{BTreeMap, BTreeSet};

use htd_core::{BagId, HyperedgeId, VertexId};
use htd_graph::{Decomposition, Instance};

use crate::violation::{Violation, ViolationKind};

/// Checks that `decomposition` is a decomposition of `instance` of the family
/// its header names.
///
/// Conditions are evaluated in a fixed order and the first failure is
/// returned: header vertex count, header hyperedge count, hyperedge coverage,
/// bag coverage by labels, then the descendant condition. A `ghtd` header
/// skips the descendant condition.
pub fn validate(instance: &Instance, decomposition: &Decomposition) -> Result<(), Violation> {
    let outcome = check_header(instance, decomposition)
        .and_then(|()| check_hyperedge_coverage(instance, decomposition))
        .and_then(|()| check_label_coverage(instance, decomposition))
        .and_then(|()| {
            if decomposition.kind().requires_descendant_condition() {
                check_descendant_condition(instance, decomposition)
            } else {
                Ok(())
            }
        });
    match &outcome {
        Ok(()) => tracing::info!(
            bags = decomposition.num_bags(),
            width = decomposition.width(),
            "decomposition is structurally valid"
        ),
        Err(violation) => tracing::info!(
            code = violation.kind.code(),
            witness = ?violation.witness,
            "decomposition rejected"
        ),
    }
    outcome
}

/// Compares the decomposition header against the instance dimensions.
pub fn check_header(instance: &Instance, decomposition: &Decomposition) -> Result<(), Violation> {
    if decomposition.num_vertices() != instance.num_vertices() {
        return Err(Violation::new(ViolationKind::VertexCountMismatch)
            .with_witness("declared", decomposition.num_vertices())
            .with_witness("instance", instance.num_vertices()));
    }
    if decomposition.num_hyperedges() != instance.num_hyperedges() {
        return Err(Violation::new(ViolationKind::HyperedgeCountMismatch)
            .with_witness("declared", decomposition.num_hyperedges())
            .with_witness("instance", instance.num_hyperedges()));
    }
    Ok(())
}

/// Every hyperedge must be contained in at least one bag.
pub fn check_hyperedge_coverage(
    instance: &Instance,
    decomposition: &Decomposition,
) -> Result<(), Violation> {
    let holders = vertex_holders(decomposition);
    for (edge, vertices) in instance.hyperedges() {
        // A covering bag must hold the smallest vertex.
        let covered = match vertices.first() {
            None => true,
            Some(first) => holders.get(first).is_some_and(|bags| {
                bags.iter()
                    .filter_map(|bag| decomposition.bag(*bag))
                    .any(|bag| bag.is_superset(vertices))
            }),
        };
        if !covered {
            return Err(
                Violation::new(ViolationKind::HyperedgeNotCovered).with_witness("hyperedge", edge)
            );
        }
    }
    Ok(())
}

/// Every bag must be contained in the union of its labeled hyperedges.
pub fn check_label_coverage(
    instance: &Instance,
    decomposition: &Decomposition,
) -> Result<(), Violation> {
    for (bag, vertices, labels) in decomposition.bags() {
        let covered: BTreeSet<VertexId> = labels
            .iter()
            .filter_map(|edge| instance.hyperedge(*edge))
            .flatten()
            .copied()
            .collect();
        if let Some(vertex) = vertices.difference(&covered).next() {
            return Err(Violation::new(ViolationKind::BagNotCovered)
                .with_witness("bag", bag)
                .with_witness("vertex", vertex));
        }
    }
    Ok(())
}

/// For every bag `b` and labeled hyperedge `h`, the vertices of `h` that
/// occur anywhere in the subtree rooted at `b` must already be in `b`.
///
/// Runs in one pre-order pass when the parse waived nothing. The bags holding
/// a vertex are then connected, so the vertex occurs below `b` exactly when
/// its topmost bag lies in the pre-order span of `b`.
pub fn check_descendant_condition(
    instance: &Instance,
    decomposition: &Decomposition,
) -> Result<(), Violation> {
    let spans = match decomposition.waived() {
        [] => PreorderSpans::new(decomposition),
        _ => None,
    };
    let Some(spans) = spans else {
        return check_descendant_condition_by_subtree(instance, decomposition);
    };
    for (bag, vertices, labels) in decomposition.bags() {
        for edge in labels {
            let Some(edge_vertices) = instance.hyperedge(*edge) else {
                continue;
            };
            let leaked = edge_vertices
                .iter()
                .find(|vertex| !vertices.contains(*vertex) && spans.occurs_below(bag, **vertex));
            if let Some(vertex) = leaked {
                return Err(descendant_violation(bag, *edge, *vertex));
            }
        }
    }
    Ok(())
}

fn check_descendant_condition_by_subtree(
    instance: &Instance,
    decomposition: &Decomposition,
) -> Result<(), Violation> {
    let tree = decomposition.tree();
    for (bag, vertices, labels) in decomposition.bags() {
        if labels.is_empty() {
            continue;
        }
        let below = subtree_vertices(decomposition, bag, tree.subtree(bag));
        for edge in labels {
            let Some(edge_vertices) = instance.hyperedge(*edge) else {
                continue;
            };
            let leaked = edge_vertices
                .iter()
                .find(|vertex| below.contains(*vertex) && !vertices.contains(*vertex));
            if let Some(vertex) = leaked {
                return Err(descendant_violation(bag, *edge, *vertex));
            }
        }
    }
    Ok(())
}

fn descendant_violation(bag: BagId, edge: HyperedgeId, vertex: VertexId) -> Violation {
    Violation::new(ViolationKind::DescendantCondition)
        .with_witness("bag", bag)
        .with_witness("hyperedge", edge)
        .with_witness("vertex", vertex)
}

/// Pre-order positions and subtree sizes of the rooted tree, plus the
/// position of the topmost bag holding each vertex.
struct PreorderSpans {
    position: Vec<usize>,
    size: Vec<usize>,
    top: BTreeMap<VertexId, usize>,
}

impl PreorderSpans {
    /// Returns `None` when the tree does not reach every bag from its root.
    fn new(decomposition: &Decomposition) -> Option<Self> {
        let tree = decomposition.tree();
        let order = tree.subtree(tree.root()?);
        if order.len() != tree.num_bags() {
            return None;
        }
        let mut position = vec![0; order.len()];
        for (pos, bag) in order.iter().enumerate() {
            position[bag.index()] = pos;
        }
        let mut size = vec![1; order.len()];
        for bag in order.iter().rev() {
            match tree.parent(*bag) {
                Some(parent) if parent != *bag => size[parent.index()] += size[bag.index()],
                _ => {}
            }
        }
        let mut top = BTreeMap::new();
        for (pos, bag) in order.iter().enumerate() {
            for vertex in decomposition.bag(*bag).into_iter().flatten() {
                top.entry(*vertex).or_insert(pos);
            }
        }
        Some(Self {
            position,
            size,
            top,
        })
    }

    fn occurs_below(&self, bag: BagId, vertex: VertexId) -> bool {
        let start = self.position[bag.index()];
        self.top
            .get(&vertex)
            .is_some_and(|top| (start..start + self.size[bag.index()]).contains(top))
    }
}

fn vertex_holders(decomposition: &Decomposition) -> BTreeMap<VertexId, Vec<BagId>> {
    let mut holders: BTreeMap<VertexId, Vec<BagId>> = BTreeMap::new();
    for (bag, vertices, _) in decomposition.bags() {
        for vertex in vertices {
            holders.entry(*vertex).or_default().push(bag);
        }
    }
    holders
}

fn subtree_vertices(
    decomposition: &Decomposition,
    root: BagId,
    members: Vec<BagId>,
) -> BTreeSet<VertexId> {
    let mut union = BTreeSet::new();
    for bag in members {
        if let Some(vertices) = decomposition.bag(bag) {
            union.extend(vertices.iter().copied());
        }
    }
    tracing::trace!(root = %root, vertices = union.len(), "collected subtree vertices");
    union
}
