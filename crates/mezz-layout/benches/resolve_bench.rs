//! Benchmarks for breakpoint resolution.
//!
//! Resolution runs on every committed resize for every observed element, so
//! it should stay well under a microsecond for typical rule sets.
//!
//! Run with: cargo bench -p mezz-layout --bench resolve_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mezz_layout::{Axis, RuleSet, resolve, rules_from_screens};
use std::hint::black_box;

fn scale(len: u32) -> RuleSet<String> {
    (0..len).map(|i| (format!("bp{i}"), i * 160)).collect()
}

// =============================================================================
// Resolution by rule-set size
// =============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/rules");

    for len in [1u32, 3, 7, 16] {
        let rules = scale(len);
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::new("width", len), &rules, |b, rules| {
            b.iter(|| black_box(resolve(Axis::Width, Some(black_box(777.0)), rules)))
        });
    }

    group.finish();
}

// =============================================================================
// Design-token conversion
// =============================================================================

fn bench_screens(c: &mut Criterion) {
    let screens = [
        ("2xl", "1536px"),
        ("sm", "640px"),
        ("xl", "1280px"),
        ("md", "768px"),
        ("lg", "1024px"),
    ];

    c.bench_function("tokens/rules_from_screens", |b| {
        b.iter(|| black_box(rules_from_screens(black_box(screens))))
    });
}

criterion_group!(benches, bench_resolve, bench_screens);
criterion_main!(benches);
