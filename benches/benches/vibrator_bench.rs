//! # Vibrator Benchmarks
//!
//! Measures the host request path: timeout policy, activate/rearm and the
//! remaining-time query against a mock rail.
//!
//! Run: `cargo bench --bench vibrator_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vibra_actuator::{MockRailProvider, TimeoutMs, TimeoutPolicy, Vibrator, VibratorConfig};

/// Benchmark policy resolution
fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("policy");
    let policy = TimeoutPolicy::default();

    for ms in [0i64, 100, 150, 151, 500, 5_000] {
        group.bench_with_input(BenchmarkId::new("resolve", ms), &ms, |b, &ms| {
            b.iter(|| black_box(policy.resolve(TimeoutMs::new(black_box(ms)))))
        });
    }

    group.finish();
}

/// Benchmark activate (rearm) and off requests
fn bench_activate(c: &mut Criterion) {
    let mut group = c.benchmark_group("activate");
    let (provider, _rail) = MockRailProvider::with_rail("hv4");
    let vib = match Vibrator::attach(&provider, VibratorConfig::default()) {
        Ok(vib) => vib,
        Err(e) => panic!("attach failed: {}", e),
    };

    // Deadline longo: o timer nunca dispara durante o bench.
    group.bench_function("rearm", |b| {
        b.iter(|| vib.activate(black_box(60_000)))
    });

    group.bench_function("on_off", |b| {
        b.iter(|| {
            let _ = vib.activate(black_box(60_000));
            vib.activate(black_box(0))
        })
    });

    group.bench_function("remaining_time", |b| {
        b.iter(|| black_box(vib.remaining_time()))
    });

    group.finish();
}

criterion_group!(benches, bench_policy, bench_activate);
criterion_main!(benches);
