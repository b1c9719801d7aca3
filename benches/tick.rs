//! Benchmark of the per-frame pipeline tick.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use face_pulse::capture::{CaptureConfig, FrameSource, MockFaceCamera, PulseConfig};
use face_pulse::pipeline::PulsePipeline;

fn bench_tick(c: &mut Criterion) {
    let capture = CaptureConfig::default();
    let mut camera = MockFaceCamera::new();
    camera.open(&capture).unwrap();

    // Eight seconds of synthetic 75 BPM footage at 30 fps.
    let frames: Vec<_> = (0..240).map(|_| camera.capture().unwrap()).collect();

    c.bench_function("pipeline_tick_64x64", |b| {
        b.iter_batched(
            || {
                (
                    PulsePipeline::new(&capture, &PulseConfig::default()).unwrap(),
                    frames.clone(),
                )
            },
            |(mut pipeline, frames)| {
                for frame in frames {
                    black_box(pipeline.tick(frame));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
