//! Matching benchmarks using Criterion.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use detection_recall::{match_frame_with, BoundingBox, MatchStrategy, RecallAccumulator};

/// Grid of boxes across `num_classes` classes, jittered by `offset`.
fn create_test_boxes(n: usize, num_classes: u32, offset: f64) -> Vec<BoundingBox> {
    let side = (n as f64).sqrt().ceil() as usize;
    let cell = 1.0 / side as f64;
    (0..n)
        .map(|i| {
            let x = (i % side) as f64 * cell + cell / 2.0 + offset;
            let y = (i / side) as f64 * cell + cell / 2.0;
            BoundingBox::new(i as u32 % num_classes, x, y, cell * 0.8, cell * 0.8)
        })
        .collect()
}

fn benchmark_match_frame_greedy_50_boxes(c: &mut Criterion) {
    let gts = create_test_boxes(50, 4, 0.0);
    let preds = create_test_boxes(60, 4, 0.01);

    c.bench_function("match_frame_greedy_50_boxes", |b| {
        b.iter(|| {
            match_frame_with(MatchStrategy::Greedy, black_box(&gts), black_box(&preds), 0.3)
        })
    });
}

fn benchmark_match_frame_optimal_50_boxes(c: &mut Criterion) {
    let gts = create_test_boxes(50, 4, 0.0);
    let preds = create_test_boxes(60, 4, 0.01);

    c.bench_function("match_frame_optimal_50_boxes", |b| {
        b.iter(|| {
            match_frame_with(MatchStrategy::Optimal, black_box(&gts), black_box(&preds), 0.3)
        })
    });
}

fn benchmark_accumulate_1000_frames(c: &mut Criterion) {
    let gts = create_test_boxes(20, 6, 0.0);
    let preds = create_test_boxes(25, 6, 0.02);

    c.bench_function("accumulate_1000_frames", |b| {
        b.iter(|| {
            let mut acc = RecallAccumulator::new();
            for _ in 0..1000 {
                acc.observe_frame(&match_frame_with(
                    MatchStrategy::Greedy,
                    black_box(&gts),
                    black_box(&preds),
                    0.3,
                ));
            }
            acc.recall()
        })
    });
}

criterion_group!(
    benches,
    benchmark_match_frame_greedy_50_boxes,
    benchmark_match_frame_optimal_50_boxes,
    benchmark_accumulate_1000_frames,
);
criterion_main!(benches);
