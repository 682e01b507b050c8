//! # Network Benchmarks
//!
//! Performance benchmarks for hospinet-core construction and analysis.
//!
//! Run with: `cargo bench -p hospinet-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hospinet_core::{
    GlobalReachingCentrality, GraphMetric, NetworkBuilder, StayRecord, TemporalNetwork,
    export_canonical, fix_overlaps, global_reaching_timeseries, snapshots_outbound,
};
use std::hint::black_box;

/// Subjects bouncing between a ring of facilities, one stay every few days.
fn synthetic_stays(subjects: usize) -> Vec<StayRecord> {
    let facilities = 20;
    let mut records = Vec::with_capacity(subjects * 6);

    for s in 0..subjects {
        let mut day = (s % 7) as f64;
        for k in 0..6 {
            let facility = (s + k * 3) % facilities;
            let length = ((s + k) % 4) as f64;
            records.push(StayRecord::new(
                format!("s{s}"),
                format!("F{facility}"),
                day,
                day + length,
            ));
            day += length + 2.0;
        }
    }

    records
}

/// Like [`synthetic_stays`], but every other stay overlaps the next one.
fn overlapping_stays(subjects: usize) -> Vec<StayRecord> {
    synthetic_stays(subjects)
        .into_iter()
        .enumerate()
        .map(|(i, mut r)| {
            if i % 2 == 0 {
                r.discharge += 3.0;
            }
            r
        })
        .collect()
}

fn network(subjects: usize) -> TemporalNetwork {
    NetworkBuilder::default()
        .build(&synthetic_stays(subjects))
        .expect("build")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_fix_overlaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("fix_overlaps");

    for size in [100, 1000, 5000].iter() {
        let records = overlapping_stays(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| black_box(fix_overlaps(records, 100)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [100, 1000, 5000].iter() {
        let records = synthetic_stays(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| black_box(NetworkBuilder::default().build(records)));
        });
    }

    group.finish();
}

fn bench_snapshots(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshots_outbound");

    for size in [100, 1000].iter() {
        let network = network(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &network, |b, network| {
            b.iter(|| black_box(snapshots_outbound(network).count()));
        });
    }

    group.finish();
}

fn bench_global_reaching(c: &mut Criterion) {
    let mut group = c.benchmark_group("global_reaching");

    for size in [100, 1000].iter() {
        let network = network(*size);
        let static_graph = network.to_static().graph;

        group.bench_with_input(
            BenchmarkId::new("timeseries", size),
            &network,
            |b, network| {
                b.iter(|| black_box(global_reaching_timeseries(network)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("static", size),
            &static_graph,
            |b, graph| {
                b.iter(|| black_box(GlobalReachingCentrality.compute(graph)));
            },
        );
    }

    group.finish();
}

fn bench_export_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_canonical");

    for size in [100, 1000].iter() {
        let network = network(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &network, |b, network| {
            b.iter(|| black_box(export_canonical(network)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fix_overlaps,
    bench_build,
    bench_snapshots,
    bench_global_reaching,
    bench_export_canonical,
);
criterion_main!(benches);
