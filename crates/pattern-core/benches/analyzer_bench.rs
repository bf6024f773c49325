//! # Analyzer Benchmarks
//!
//! Performance benchmarks for quality analysis and search.
//!
//! Run with: `cargo bench -p pattern-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pattern_core::{AnalyzerRegistry, Catalog, PatternDraft, SearchRequest};
use std::hint::black_box;

/// Python source with `functions` documented functions, each with a branch.
fn synthetic_python(functions: usize) -> String {
    let mut code = String::new();
    for i in 0..functions {
        code.push_str(&format!(
            "def f{i}(x):\n    \"\"\"Doc {i}.\"\"\"\n    if x > {i}:\n        return x\n    else:\n        return {i}\n\n"
        ));
    }
    code
}

/// In-memory catalog with `size` tagged records.
fn populated_catalog(size: usize) -> Catalog {
    let mut catalog = Catalog::new();
    for i in 0..size {
        let tag = if i % 2 == 0 { "algorithm" } else { "io" };
        let draft = PatternDraft::new(format!("pattern {i}"), "x = 1", format!("sort search {i}"))
            .tags([tag])
            .user_rating((i % 6) as f64 * 0.9);
        catalog.submit(&draft).expect("submit");
    }
    catalog
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_python_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("python_analysis");
    let registry = AnalyzerRegistry::default();

    for size in [10, 100, 1000].iter() {
        let code = synthetic_python(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &code, |b, code| {
            b.iter(|| black_box(registry.analyze(code, "python")));
        });
    }

    group.finish();
}

fn bench_filtered_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_search");
    let request = SearchRequest::new("sort search")
        .min_rating(2.0)
        .required_tags(["algorithm"]);

    for size in [100, 1000].iter() {
        let catalog = populated_catalog(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| black_box(catalog.find_similar(&request).expect("search")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_python_analysis, bench_filtered_search);
criterion_main!(benches);
