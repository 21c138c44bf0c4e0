use criterion::{black_box, criterion_group, criterion_main, Criterion};
use htd_core::RngHandle;
use htd_graph::gen_valid_case;
use htd_validate::validate;

fn validate_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(7);
    let case = gen_valid_case(2_000, 3, &mut rng).unwrap();

    c.bench_function("validate_generated_2k", |b| {
        b.iter(|| {
            let outcome = validate(black_box(&case.instance), black_box(&case.decomposition));
            black_box(outcome).unwrap();
        });
    });
}

criterion_group!(benches, validate_bench);
criterion_main!(benches);
