// ============================================================================
// Decimal Dash Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Rounding - Canonical answer formatting for both modes
// 2. Generation - Random tasks and multiple-choice distractors
// 3. Session - Full rounds through the session machine
// ============================================================================

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use decimal_dash::numeric::{format_decimal_places, format_original, format_significant_figures};
use decimal_dash::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Rounding Benchmarks
// ============================================================================

fn benchmark_rounding(c: &mut Criterion) {
    let mut group = c.benchmark_group("rounding");
    let values = [0.0045678, 3.14159, 9.996, 123.456, -12.345, 987.654321];

    for precision in [1u32, 3, 6].iter() {
        group.bench_with_input(
            BenchmarkId::new("decimal_places", precision),
            precision,
            |b, &precision| {
                b.iter(|| {
                    for value in values.iter() {
                        black_box(format_decimal_places(black_box(*value), precision).ok());
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("significant_figures", precision),
            precision,
            |b, &precision| {
                b.iter(|| {
                    for value in values.iter() {
                        black_box(format_significant_figures(black_box(*value), precision).ok());
                    }
                });
            },
        );
    }

    group.bench_function("format_original", |b| {
        b.iter(|| {
            for value in [1234567.0, 0.0000012, 42.5].iter() {
                black_box(format_original(black_box(*value)));
            }
        });
    });

    group.finish();
}

// ============================================================================
// Generation Benchmarks
// ============================================================================

fn benchmark_task_generation(c: &mut Criterion) {
    c.bench_function("task_generation", |b| {
        let mut generator = TaskGenerator::from_seed(42);
        let mut level = 0u32;
        b.iter(|| {
            level = (level + 1) % 20;
            black_box(generator.pick_task(level, TaskKind::SignificantFigures));
        });
    });
}

fn benchmark_distractors(c: &mut Criterion) {
    let mut group = c.benchmark_group("distractors");
    let generator = DistractorGenerator::default();

    for kind in [TaskKind::DecimalPlaces, TaskKind::SignificantFigures].iter() {
        let task = Task::new(47.3829, *kind, Precision::new(3).unwrap()).unwrap();
        let answer = task.canonical_answer();

        group.bench_with_input(
            BenchmarkId::new("generate", format!("{:?}", kind)),
            &(task, answer),
            |b, (task, answer)| {
                let mut rng = StdRng::seed_from_u64(7);
                b.iter(|| black_box(generator.generate(answer, task, &mut rng)));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Session Benchmarks
// ============================================================================

fn benchmark_session_round(c: &mut Criterion) {
    c.bench_function("session_round", |b| {
        let source = ScriptedTaskSource::repeating(3.4, Precision::new(2).unwrap()).unwrap();
        let mut machine = SessionMachineBuilder::new()
            .with_task_source(Box::new(source))
            .with_event_handler(Arc::new(NoOpEventHandler))
            .build()
            .unwrap();
        machine.start().unwrap();

        b.iter(|| {
            black_box(machine.submit("3.40").ok());
            if machine.acknowledge_level_transition().is_err() {
                machine.advance(Duration::from_millis(1500));
            }
        });
    });
}

fn benchmark_countdown(c: &mut Criterion) {
    c.bench_function("countdown_full_round", |b| {
        let mut machine = SessionMachineBuilder::new()
            .with_starting_lives(u32::MAX)
            .with_seed(3)
            .build()
            .unwrap();
        machine.start().unwrap();

        b.iter(|| {
            // Timeout plus feedback pause opens the next round
            black_box(machine.advance(Duration::from_millis(31_500)));
        });
    });
}

criterion_group!(
    benches,
    benchmark_rounding,
    benchmark_task_generation,
    benchmark_distractors,
    benchmark_session_round,
    benchmark_countdown,
);
criterion_main!(benches);
