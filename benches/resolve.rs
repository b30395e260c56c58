//! Benchmarks for registry assembly, interpreter resolution and polling.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hotrun::core::{InterpreterRegistry, RegistryLoader};
use hotrun::sources::DefaultsSource;
use hotrun::watch::WatchedFile;
use std::fs;
use tempfile::TempDir;

/// Benchmark merging the built-in table through the loader
fn benchmark_load_defaults(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");
    group.bench_function("load_defaults", |b| {
        b.iter(|| {
            let mut loader = RegistryLoader::new();
            loader.add_source(Box::new(DefaultsSource::new()));
            black_box(loader.load().unwrap());
        });
    });
    group.finish();
}

/// Benchmark resolution where the last of `n` candidates is the only one present
fn benchmark_resolve_depth(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("resolve");

    for depth in [1usize, 4, 16] {
        let mut candidates: Vec<_> = (0..depth - 1)
            .map(|i| dir.path().join(format!("missing-{depth}-{i}")))
            .collect();
        let present = dir.path().join(format!("present-{depth}"));
        fs::write(&present, "").unwrap();
        candidates.push(present);

        let registry = InterpreterRegistry::new().with_interpreter("py", candidates);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &registry, |b, registry| {
            b.iter(|| black_box(registry.resolve("py").unwrap()));
        });
    }
    group.finish();
}

/// Benchmark one timestamp comparison
fn benchmark_poll(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.py");
    fs::write(&path, "print('hi')").unwrap();

    let mut file = WatchedFile::new(&path);
    let stamp = file.current_stamp().unwrap();
    file.record(stamp);

    c.bench_function("poll_unchanged", |b| {
        b.iter(|| black_box(file.changed().unwrap()));
    });
}

criterion_group!(
    benches,
    benchmark_load_defaults,
    benchmark_resolve_depth,
    benchmark_poll
);
criterion_main!(benches);
