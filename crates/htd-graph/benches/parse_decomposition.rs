use htd_core::{RngHandle, Strictness};
use htd_graph::{gen_valid_case, Decomposition};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn parse_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let case = gen_valid_case(5_000, 3, &mut rng).unwrap();
    let text = case.decomposition.to_text();

    c.bench_function("parse_decomposition_5k", |b| {
        b.iter(|| {
            let decomposition = Decomposition::parse_str(&text, Strictness::Strict).unwrap();
            black_box(decomposition);
        });
    });
}

criterion_group!(benches, parse_bench);
criterion_main!(benches);
