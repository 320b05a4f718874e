//! Benchmarks for running complete matches.
//!
//! This covers the full runner loop: observation, decision, apply.

#![allow(missing_docs)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use ctf_reflex::game::Board;
use ctf_reflex::tournament::{LayoutSource, Lineup, generate_layout, run_match, run_tournament};
use ctf_reflex::{Layout, MatchConfig};

fn bench_default_match(c: &mut Criterion) {
    let layout = Layout::default_capture().expect("default layout parses");
    let lineup = Lineup::default();
    let config = MatchConfig::default();

    c.bench_function("match_default_layout", |b| {
        b.iter(|| {
            let result = run_match(black_box(42), layout.clone(), &lineup, &config);
            black_box(result)
        });
    });
}

fn bench_short_match(c: &mut Criterion) {
    let layout = generate_layout(7, 20, 9).expect("generated layout");
    let lineup = Lineup::default();
    let config = MatchConfig {
        max_turns: 100,
        ..MatchConfig::default()
    };

    c.bench_function("match_generated_100_turns", |b| {
        b.iter(|| {
            let result = run_match(black_box(7), layout.clone(), &lineup, &config);
            black_box(result)
        });
    });
}

fn bench_tournament_batch(c: &mut Criterion) {
    let layout = Layout::default_capture().expect("default layout parses");
    let source = LayoutSource::Fixed(Arc::new(Board::new(layout)));
    let lineup = Lineup::default();
    let config = MatchConfig {
        max_turns: 300,
        ..MatchConfig::default()
    };

    let mut group = c.benchmark_group("tournament");
    group.sample_size(10);
    group.bench_function("8_games_parallel", |b| {
        b.iter(|| black_box(run_tournament(black_box(0), 8, &source, &lineup, &config)));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_default_match,
    bench_short_match,
    bench_tournament_batch
);
criterion_main!(benches);
