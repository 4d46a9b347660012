//! Criterion benchmarks for the gate's per-sample path
//!
//! Run with: cargo bench
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use percgate_engine::{BandDetector, DrumClass, GateEngine, GateSettings, profile_for};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            // 200 Hz body plus a sprinkle of highs, percussive-ish
            (2.0 * std::f32::consts::PI * 200.0 * t).sin() * 0.4
                + (2.0 * std::f32::consts::PI * 4200.0 * t).sin() * 0.1
        })
        .collect()
}

fn bench_gate_stereo(c: &mut Criterion) {
    let profile = profile_for(Some(&DrumClass::Snare));
    let mut gate = GateEngine::new();
    gate.reconfigure(&GateSettings::default(), SAMPLE_RATE, Some(&profile));

    let mut group = c.benchmark_group("GateEngine/stereo");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    gate.process_block(black_box(&mut [&mut left, &mut right]));
                    black_box(left[0])
                })
            },
        );
    }
    group.finish();
}

fn bench_gate_broadband_only(c: &mut Criterion) {
    // No profile: no detector, no sidechain EQ, pure envelope path.
    let mut gate = GateEngine::new();
    gate.reconfigure(&GateSettings::default(), SAMPLE_RATE, None);

    let mut group = c.benchmark_group("GateEngine/broadband");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut mono = input.clone();
                b.iter(|| {
                    gate.process_block(black_box(&mut [&mut mono]));
                    black_box(mono[0])
                })
            },
        );
    }
    group.finish();
}

fn bench_detector(c: &mut Criterion) {
    let profile = profile_for(Some(&DrumClass::Kick));
    let mut detector = BandDetector::new(&profile.focus_bands, SAMPLE_RATE).unwrap();
    let input = generate_test_signal(1024);

    c.bench_function("BandDetector/1024", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for &x in &input {
                acc += detector.process(black_box(x));
            }
            black_box(acc)
        })
    });
}

criterion_group!(
    benches,
    bench_gate_stereo,
    bench_gate_broadband_only,
    bench_detector
);
criterion_main!(benches);
