use htd_core::{BagId, RngHandle};
use htd_graph::{gen_random_tree, DecompositionTree};
use proptest::prelude::*;
use rand::Rng;

fn build(num_bags: usize, edges: &[(BagId, BagId)]) -> DecompositionTree {
    let mut tree = DecompositionTree::new(num_bags);
    for (u, v) in edges {
        tree.add_edge(*u, *v).unwrap();
    }
    tree.make_rooted();
    tree
}

fn members(mask: &[bool]) -> Vec<BagId> {
    mask.iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(idx, _)| BagId::from_index(idx))
        .collect()
}

proptest! {
    #[test]
    fn random_trees_are_valid(seed in any::<u64>(), num_bags in 1usize..48) {
        let mut rng = RngHandle::from_seed(seed);
        let edges = gen_random_tree(num_bags, &mut rng);
        let tree = build(num_bags, &edges);
        prop_assert!(tree.is_valid_tree());
        prop_assert_eq!(tree.parent_edges().len(), num_bags - 1);
        let root = tree.root().unwrap();
        prop_assert_eq!(tree.subtree(root).len(), num_bags);
    }

    #[test]
    fn removing_an_edge_breaks_the_tree(seed in any::<u64>(), num_bags in 2usize..48) {
        let mut rng = RngHandle::from_seed(seed);
        let mut edges = gen_random_tree(num_bags, &mut rng);
        let victim = rng.gen_range(0..edges.len());
        edges.remove(victim);
        prop_assert!(!build(num_bags, &edges).is_valid_tree());
    }

    #[test]
    fn adding_an_edge_breaks_the_tree(seed in any::<u64>(), num_bags in 3usize..48) {
        let mut rng = RngHandle::from_seed(seed);
        let mut edges = gen_random_tree(num_bags, &mut rng);
        let u = rng.gen_range(0..num_bags);
        let v = (u + rng.gen_range(1..num_bags)) % num_bags;
        edges.push((BagId::from_index(u), BagId::from_index(v)));
        prop_assert!(!build(num_bags, &edges).is_valid_tree());
    }

    #[test]
    fn path_components_are_contiguous_ranges(mask in proptest::collection::vec(any::<bool>(), 1..24)) {
        let n = mask.len();
        let edges: Vec<_> = (1..n)
            .map(|idx| (BagId::from_index(idx - 1), BagId::from_index(idx)))
            .collect();
        let tree = build(n, &edges);
        let subset = members(&mask);
        let contiguous = match (subset.first(), subset.last()) {
            (Some(first), Some(last)) => {
                (last.as_raw() - first.as_raw()) as usize + 1 == subset.len()
            }
            _ => false,
        };
        prop_assert_eq!(tree.is_connected_component(&subset), contiguous);
    }

    #[test]
    fn star_components_need_the_centre(mask in proptest::collection::vec(any::<bool>(), 2..24)) {
        let n = mask.len();
        let centre = BagId::from_index(0);
        let edges: Vec<_> = (1..n).map(|idx| (centre, BagId::from_index(idx))).collect();
        let tree = build(n, &edges);
        let subset = members(&mask);
        let expected = subset.len() == 1 || subset.contains(&centre);
        prop_assert_eq!(tree.is_connected_component(&subset), expected);
    }
}

#[test]
fn star_full_set_and_singletons_are_connected() {
    let n = 6;
    let centre = BagId::from_index(0);
    let edges: Vec<_> = (1..n).map(|idx| (centre, BagId::from_index(idx))).collect();
    let tree = build(n, &edges);
    let all: Vec<_> = (0..n).map(BagId::from_index).collect();
    assert!(tree.is_connected_component(&all));
    for bag in &all {
        assert!(tree.is_connected_component(&[*bag]));
    }
    assert!(!tree.is_connected_component(&[BagId::from_raw(2), BagId::from_raw(3)]));
    assert!(!tree.is_connected_component(&[]));
}
