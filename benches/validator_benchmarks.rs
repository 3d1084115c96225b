//! Benchmarks for identifier validation and policy checks
//!
//! Validation runs before every start, so it should stay in the
//! microsecond range even for names at the length limit.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flowline::guardian::PolicyConfig;
use flowline::validator::{suggest_branch_name, validate_branch_fragment, validate_version};
use std::hint::black_box;

fn bench_branch_fragments(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_fragment");

    let inputs = [
        ("short", "login".to_string()),
        ("nested", "api/rate-limit-v2".to_string()),
        ("at_limit", "a-".repeat(24) + "ab"),
        ("invalid", "Bad Name; rm -rf".to_string()),
    ];

    for (label, name) in &inputs {
        group.bench_with_input(BenchmarkId::new("validate", label), name, |b, name| {
            b.iter(|| validate_branch_fragment(black_box(name)))
        });
        group.bench_with_input(BenchmarkId::new("suggest", label), name, |b, name| {
            b.iter(|| suggest_branch_name(black_box(name)))
        });
    }

    group.finish();
}

fn bench_versions(c: &mut Criterion) {
    let mut group = c.benchmark_group("version");
    for version in ["1.0.0", "12.345.6789", "v1.0.0", "01.2.3"] {
        group.bench_with_input(BenchmarkId::new("validate", version), version, |b, v| {
            b.iter(|| validate_version(black_box(v)))
        });
    }
    group.finish();
}

fn bench_policy(c: &mut Criterion) {
    let policy = PolicyConfig::compile(
        "^[a-z0-9]+([.-][a-z0-9]+)*$",
        50,
        ["wip", "tmp", "test"],
    )
    .unwrap();

    c.bench_function("policy_violations", |b| {
        b.iter(|| policy.violations(black_box("feature/user-auth-refresh"), "feature/"))
    });
}

criterion_group!(benches, bench_branch_fragments, bench_versions, bench_policy);
criterion_main!(benches);
