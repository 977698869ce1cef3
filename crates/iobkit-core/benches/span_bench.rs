use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iobkit_core::{Rand64, Sentence, TagStore};

fn build_store(sentences: usize) -> TagStore {
    (0..sentences)
        .map(|i| {
            Sentence::from_pairs([
                ("Single-cell", "O"),
                ("profiling", "O"),
                ("of", "O"),
                ("human", "B-tissue"),
                ("heart", "I-tissue"),
                ("tissue", "I-tissue"),
                ("identified", "O"),
                (if i % 2 == 0 { "fibroblasts" } else { "cardiomyocytes" }, "B-cell_type"),
                (".", "O"),
            ])
            .unwrap()
        })
        .collect()
}

fn bench_spans(c: &mut Criterion) {
    let store = build_store(1_000);

    c.bench_function("compute_spans_1k_sentences", |b| {
        b.iter(|| black_box(&store).compute_spans().unwrap());
    });

    c.bench_function("annotation_document_1k_sentences", |b| {
        b.iter(|| black_box(&store).to_annotation_document("bench").unwrap());
    });
}

fn bench_partition(c: &mut Criterion) {
    let store = build_store(1_000);

    c.bench_function("make_10_folds", |b| {
        b.iter(|| black_box(&store).make_k_folds(10));
    });

    c.bench_function("random_sample_100", |b| {
        b.iter(|| {
            let mut rng = Rand64::new(42);
            black_box(&store).random_sample(100, &mut rng).unwrap()
        });
    });
}

criterion_group!(benches, bench_spans, bench_partition);
criterion_main!(benches);
