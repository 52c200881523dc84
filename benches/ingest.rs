use std::hint::black_box;
use std::io::Write;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use envfile::{MemoryEnv, Policy};
use tempfile::NamedTempFile;

fn fixture(lines: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for i in 0..lines {
        writeln!(file, "KEY_{i}=value_{i}").expect("write line");
    }
    file
}

fn bench_ingest(c: &mut Criterion) {
    let file = fixture(256);
    c.bench_function("ingest/256-lines", |b| {
        b.iter(|| {
            let mut store = MemoryEnv::new();
            envfile::ingest(black_box(file.path()), &mut store, Policy::default())
                .expect("ingest should succeed");
            store
        });
    });
}

fn bench_pool_sizes(c: &mut Criterion) {
    let file = fixture(1024);
    let mut group = c.benchmark_group("ingest_workers");
    let mut seen = Vec::new();
    for workers in [2usize, 4, 8, 16] {
        // Clamping can fold two requests into the same effective size.
        let effective = envfile::set_parallel_tasks(workers);
        if seen.contains(&effective) {
            continue;
        }
        seen.push(effective);
        group.bench_with_input(BenchmarkId::from_parameter(effective), &file, |b, file| {
            b.iter(|| {
                let mut store = MemoryEnv::new();
                envfile::ingest(black_box(file.path()), &mut store, Policy::default())
                    .expect("ingest should succeed");
                store
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ingest, bench_pool_sizes);
criterion_main!(benches);
