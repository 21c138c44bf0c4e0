use htd_core::{RngHandle, Strictness};
use htd_graph::{
    decomposition_hash, gen_case_suite, gen_valid_case, instance_hash, Decomposition,
    GeneratedCase, Instance,
};
use proptest::prelude::*;

fn assert_equivalent(left: &Decomposition, right: &Decomposition) {
    assert_eq!(left.header(), right.header());
    assert_eq!(left.tree().root(), right.tree().root());
    assert_eq!(left.tree().parent_edges(), right.tree().parent_edges());
    let left_bags: Vec<_> = left.bags().collect();
    let right_bags: Vec<_> = right.bags().collect();
    assert_eq!(left_bags, right_bags);
    assert_eq!(decomposition_hash(left), decomposition_hash(right));
}

proptest! {
    #[test]
    fn generated_cases_roundtrip(seed in any::<u64>(), num_bags in 1usize..32, max_fresh in 1usize..4) {
        let mut rng = RngHandle::from_seed(seed);
        let case = gen_valid_case(num_bags, max_fresh, &mut rng).unwrap();

        let instance = Instance::parse_str(&case.instance.to_text()).unwrap();
        prop_assert_eq!(&instance, &case.instance);
        prop_assert_eq!(instance_hash(&instance), instance_hash(&case.instance));

        let text = case.decomposition.to_text();
        let restored = Decomposition::parse_str(&text, Strictness::Strict).unwrap();
        assert_equivalent(&case.decomposition, &restored);
        prop_assert_eq!(restored.to_text(), text);
    }
}

#[test]
fn edge_direction_and_order_do_not_matter_after_normalizing() {
    let shuffled = "s htd 4 1 4 1\n\
b 4 4 1\n\
2 4\n\
b 1 1 2\n\
1 3\n\
b 2 1 3\n\
1 2\n\
b 3 1\n\
w 1 1 1\n";
    let decomposition = Decomposition::parse_str(shuffled, Strictness::Strict).unwrap();
    let text = decomposition.to_text();
    assert_eq!(
        text,
        "s htd 4 1 4 1\n1 2\n1 3\n2 4\nb 1 1 2\nw 1 1 1\nb 2 1 3\nb 3 1\nb 4 1 4\n"
    );
    let restored = Decomposition::parse_str(&text, Strictness::Strict).unwrap();
    assert_equivalent(&decomposition, &restored);
}

#[test]
fn suites_are_reproducible() {
    let first = gen_case_suite(99, 4, 12, 3).unwrap();
    let second = gen_case_suite(99, 4, 12, 3).unwrap();
    let hashes = |cases: &[GeneratedCase]| {
        cases
            .iter()
            .map(|case| decomposition_hash(&case.decomposition))
            .collect::<Vec<_>>()
    };
    assert_eq!(hashes(&first), hashes(&second));
    assert!(first.iter().all(|case| case.decomposition.width() <= 2));
}
