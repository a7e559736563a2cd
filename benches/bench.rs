//! Benchmarks for the distance kernel and query encoding.

use criterion::{Criterion, criterion_group, criterion_main};
use symsearch::prelude::*;
use symsearch::spelling::{damerau_levenshtein_distance, damerau_levenshtein_distance_threshold};

fn bench_distance(c: &mut Criterion) {
    c.bench_function("damerau_levenshtein_distance", |b| {
        b.iter(|| damerau_levenshtein_distance(std::hint::black_box("corporation"), "coropration"))
    });

    c.bench_function("damerau_levenshtein_distance_threshold", |b| {
        b.iter(|| {
            damerau_levenshtein_distance_threshold(
                std::hint::black_box("corporation"),
                "international",
                2,
            )
        })
    });
}

fn bench_query_vector(c: &mut Criterion) {
    let mut extractor = SymbolExtractor::new();
    for i in 0..500 {
        let record = SymbolRecord::new(
            format!("SYM{i}"),
            format!("company number {i} holdings incorporated"),
        );
        extractor.ingest_record(&record).unwrap();
    }
    extractor.train().unwrap();

    c.bench_function("search_exact_only", |b| {
        b.iter(|| extractor.search(std::hint::black_box("holdings"), 5, 0).unwrap())
    });

    c.bench_function("search_fuzzy", |b| {
        b.iter(|| extractor.search(std::hint::black_box("holdigns"), 5, 1).unwrap())
    });
}

criterion_group!(benches, bench_distance, bench_query_vector);
criterion_main!(benches);
