//! Engine throughput benchmarks.
//!
//! Run with: `cargo bench --package candlewick-bench`

use candlewick_bench::TickStream;
use candlewick_engine::SyntheticEngine;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn reference_engine() -> SyntheticEngine {
    SyntheticEngine::reference().expect("reference timeframes are valid")
}

fn ingest_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for symbols in [1_usize, 16, 256] {
        let ticks = TickStream::new(symbols).generate(10_000);
        group.throughput(Throughput::Elements(ticks.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("reference", symbols),
            &ticks,
            |b, ticks| {
                b.iter(|| {
                    let engine = reference_engine();
                    for tick in ticks {
                        engine.ingest(black_box(tick)).expect("synthetic tick is valid");
                    }
                    engine
                });
            },
        );
    }

    group.finish();
}

fn query_benchmark(c: &mut Criterion) {
    let engine = reference_engine();
    let stream = TickStream::new(64);
    for tick in stream.generate(50_000) {
        engine.ingest(&tick).expect("synthetic tick is valid");
    }
    let now = stream.start + 3_600;

    let mut group = c.benchmark_group("query");
    group.bench_function("get_all_candles", |b| {
        b.iter(|| engine.get_all_candles_at(black_box("SYM0007"), now));
    });
    group.bench_function("get_candles_subset", |b| {
        b.iter(|| engine.get_candles_at(black_box("SYM0007"), &["1m", "1h", "day"], now));
    });
    group.bench_function("get_candle", |b| {
        b.iter(|| engine.get_candle_at(black_box("SYM0007"), "5m", now));
    });
    group.finish();
}

criterion_group!(benches, ingest_benchmark, query_benchmark);
criterion_main!(benches);
