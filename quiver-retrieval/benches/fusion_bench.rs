use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quiver_core::candidate::RetrievedDoc;
use quiver_retrieval::fusion::rrf::{fuse, RankedList};

fn make_list(retriever: &str, weight: f64, count: usize, salt: usize) -> RankedList {
    RankedList {
        retriever: retriever.to_string(),
        weight,
        docs: (0..count)
            .map(|i| RetrievedDoc {
                id: format!("{retriever}-{}", (i * 7 + salt) % (count * 2)),
                score: 1.0 / (i + 1) as f64,
                content: format!("evidence passage {salt} number {i} about topic {}", i % 13),
            })
            .collect(),
    }
}

fn bench_fusion(c: &mut Criterion) {
    let lists = vec![
        make_list("keyword", 0.7, 100, 1),
        make_list("dense", 0.2, 100, 3),
        make_list("web", 0.1, 50, 5),
    ];

    c.bench_function("rrf_fuse_3x100", |b| {
        b.iter(|| fuse(black_box(&lists), 60, 0.9, 0))
    });
}

criterion_group!(benches, bench_fusion);
criterion_main!(benches);
