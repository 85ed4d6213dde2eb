//! Narrative and console-log benchmarks.
//!
//! Measures the pieces that run once per line: rendering narratives, bumping
//! the shared counter, appending to the log buffer and parsing responses.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ipc_debugger::client::api::parse_outcome;
use ipc_debugger::client::LogBuffer;
use ipc_debugger::simulation::narrative;
use ipc_debugger::SharedCounter;

// ---------------------------------------------------------------------------
// Bench: narrative rendering
// ---------------------------------------------------------------------------

fn bench_narratives(c: &mut Criterion) {
    let mut group = c.benchmark_group("narrative");
    for len in [8usize, 256, 4096] {
        let message = "ä".repeat(len);
        group.bench_with_input(BenchmarkId::new("pipe", len), &message, |b, m| {
            b.iter(|| black_box(narrative::pipe(m)))
        });
        group.bench_with_input(BenchmarkId::new("queue", len), &message, |b, m| {
            b.iter(|| black_box(narrative::queue(m)))
        });
    }
    group.bench_function("deadlock", |b| b.iter(|| black_box(narrative::deadlock())));
    group.finish();
}

// ---------------------------------------------------------------------------
// Bench: shared counter read-modify-write
// ---------------------------------------------------------------------------

fn bench_shared_bump(c: &mut Criterion) {
    let counter = SharedCounter::default();
    c.bench_function("shared_counter_bump", |b| {
        b.iter(|| black_box(counter.bump(black_box(5))))
    });
}

// ---------------------------------------------------------------------------
// Bench: log append and response parsing
// ---------------------------------------------------------------------------

fn bench_log_append(c: &mut Criterion) {
    c.bench_function("log_buffer_append_1000", |b| {
        b.iter(|| {
            let mut buf = LogBuffer::default();
            for _ in 0..1000 {
                buf.push("Processing through pipe...");
            }
            black_box(buf.entries().len())
        })
    });
}

fn bench_parse_outcome(c: &mut Criterion) {
    let body = serde_json::json!({ "logs": narrative::deadlock() }).to_string();
    c.bench_function("parse_outcome_deadlock", |b| {
        b.iter(|| black_box(parse_outcome(black_box(&body))))
    });
}

criterion_group!(
    benches,
    bench_narratives,
    bench_shared_bump,
    bench_log_append,
    bench_parse_outcome
);
criterion_main!(benches);
