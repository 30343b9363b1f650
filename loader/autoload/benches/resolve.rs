//! Resolution benchmarks.
//!
//! Measures the prefix walk plus candidate probing against an in-memory file
//! set, so the numbers cover the resolver itself and not filesystem latency.
//! With cross-mapping fallback on, each matched level probes every mapping,
//! which is the cost that grows with the number of registrations.

use std::hint::black_box;
use std::path::PathBuf;

use autoload::{AutoloadConfig, ClassResolver, MemoryLoader, Registry};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Registry with `n` namespaces `Ns0` .. `Ns{n-1}`.
fn registry_with(config: &AutoloadConfig, n: usize) -> Registry {
    let mut registry = Registry::new(config);
    for i in 0..n {
        registry.register(&format!("Ns{i}"), None, Some(&format!("kind{i}")));
    }
    registry
}

/// Miss: every mapping is probed at the matched level.
fn bench_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/miss");

    for mappings in [1, 10, 50, 200] {
        let config = AutoloadConfig::new("App").with_abspath("/srv/app");
        let resolver = ClassResolver::from_config(
            &config,
            registry_with(&config, mappings),
            MemoryLoader::new(),
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(mappings),
            &resolver,
            |b, resolver| {
                b.iter(|| {
                    let found = resolver.resolve(black_box("App\\Ns0\\Deep\\Nested\\Missing"));
                    resolver.loader().clear_log();
                    found
                });
            },
        );
    }

    group.finish();
}

/// Candidate listing without any probing, fallback on and off.
fn bench_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve/candidates");

    for fallback in [true, false] {
        let mut config = AutoloadConfig::new("App").with_abspath(PathBuf::from("/srv/app"));
        if !fallback {
            config = config.without_cross_mapping_fallback();
        }
        let resolver =
            ClassResolver::from_config(&config, registry_with(&config, 50), MemoryLoader::new());

        group.bench_with_input(
            BenchmarkId::from_parameter(if fallback { "fallback" } else { "exact" }),
            &resolver,
            |b, resolver| {
                b.iter(|| resolver.candidates(black_box("App\\Ns25\\Book")));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_miss, bench_candidates);
criterion_main!(benches);
