//! Benchmarks for the echo and feedback delay processors.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use furse_delay::{DelayControls, DelayVariant};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];
const LABELS: &[&str] = &["delay_0.1s", "delay_60s", "fbdelay_0.1s", "fbdelay_60s"];

fn bench_delays(c: &mut Criterion) {
    let mut group = c.benchmark_group("delay");

    for &label in LABELS {
        let Some(variant) = DelayVariant::find(label) else {
            continue;
        };
        let controls = DelayControls {
            delay_seconds: variant.max_delay_seconds * 0.5,
            dry_wet: 0.5,
            feedback: 0.7,
        };

        for &size in BLOCK_SIZES {
            let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
            let mut output = vec![0.0; size];
            let Ok(mut processor) = variant.instantiate(SAMPLE_RATE) else {
                continue;
            };
            processor.activate();

            group.bench_with_input(BenchmarkId::new(label, size), &size, |b, _| {
                b.iter(|| {
                    processor.process(black_box(&input), black_box(&mut output), &controls);
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_delays);
criterion_main!(benches);
