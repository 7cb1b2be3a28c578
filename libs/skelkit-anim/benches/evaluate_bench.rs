use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::{Quat, Vec3};
use skelkit_anim::{BonePalette, MAX_BONES, MemoryModel, PlaybackState, Skeleton, evaluate, load_clips};

/// A single chain of `bones` bones with a clip of `frames` keyframes, 33 ms apart
fn create_chain_model(bones: usize, frames: u32) -> MemoryModel {
    let mut model = MemoryModel::new();
    let mut parent = None;
    for i in 0..bones {
        let index = model.add_bone(&format!("bone_{i}"), parent, Vec3::Y, Quat::IDENTITY);
        parent = Some(index);
    }

    let action = model.add_action("sway");
    for frame in 0..frames {
        let angle = (frame as f32 * 0.2).sin() * 0.3;
        let pose: Vec<_> = (0..bones)
            .map(|_| (Vec3::Y, Quat::from_rotation_z(angle)))
            .collect();
        model.add_frame(action, frame * 33, &pose);
    }
    model
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for bones in [4, 16, MAX_BONES - 1] {
        let model = create_chain_model(bones, 60);
        let skeleton = Skeleton::from_source(&model).unwrap();
        let clips = load_clips(&model).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(bones), &bones, |b, _| {
            let mut palette = BonePalette::new();
            let mut state = PlaybackState::new(&clips[0], true);
            b.iter(|| {
                evaluate(
                    palette.as_mut_slice(),
                    Some(&skeleton),
                    &mut state,
                    black_box(1.0 / 60.0),
                );
            });
        });
    }
    group.finish();
}

fn bench_load_clips(c: &mut Criterion) {
    let model = create_chain_model(MAX_BONES - 1, 120);

    c.bench_function("load_clips", |b| {
        b.iter(|| {
            let _clips = load_clips(black_box(&model)).unwrap();
        })
    });
}

criterion_group!(benches, bench_evaluate, bench_load_clips);
criterion_main!(benches);
