use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bevy::math::Vec3;
use bevy::prelude::Transform;
use brawler::level::{BoundingBox, GeometryQuery, Level, Obstacle};
use brawler::level::loader as level_loader;
use brawler::player::{
    ClipPlayer, DirectionKeys, InputSnapshot, PlayerController, ResolverParams, SessionContext,
    facing_yaw, resolve,
};
use brawler::settings::Settings;

/// A field of `n * n` crates on a floor, in row order.
fn crate_field(n: i32) -> Level {
    let mut level = Level::arena();
    let boxes = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| {
            let x = i as f32 * 3.0 - n as f32 * 1.5;
            let z = j as f32 * 3.0 - n as f32 * 1.5;
            BoundingBox::new(Vec3::new(x, 0.0, z), Vec3::new(x + 1.0, 1.0, z + 1.0))
        })
        .collect();
    level.obstacles.push(Obstacle::new("crates", boxes));
    level
}

/// Resolve many diagonal moves against the arena plus a crate field.
fn bench_resolve_sweep(c: &mut Criterion) {
    let level = crate_field(10);
    let params = ResolverParams::default();

    c.bench_function("resolve_sweep_crate_field", |b| {
        b.iter(|| {
            let mut state: u32 = 0x12345678;
            for _ in 0..1_000usize {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let x = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 30.0 - 15.0;
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                let z = (((state >> 16) & 0x7fff) as f32 / 32767.0) * 30.0 - 15.0;

                let old = Vec3::new(x, 0.5, z);
                let mut disp = Vec3::new(0.4, -0.6, -0.3);
                let mut new = old + disp;
                let contacts = resolve(old, &mut new, &mut disp, level.bounding_boxes(), &params);
                black_box((new, contacts));
            }
        })
    });
}

/// Step the full controller pipeline for many frames of mixed input.
fn bench_controller_frames(c: &mut Criterion) {
    let level = crate_field(6);
    let ctx = match SessionContext::from_settings(&Settings::defaults()) {
        Ok(ctx) => ctx,
        Err(e) => panic!("default settings must build a context: {e}"),
    };

    c.bench_function("controller_many_frames", |b| {
        b.iter(|| {
            let mut controller = PlayerController::new(ctx.clone(), Vec3::new(0.0, 3.0, 0.0));
            let mut clips = ClipPlayer::default();
            let mut tf = Transform::default();
            let mut cam = Transform::default();
            let dt = 1.0f32 / 60.0f32;

            for i in 0..5_000usize {
                let input = InputSnapshot {
                    directions: DirectionKeys::from_bits_truncate(((i / 40) % 16) as u8),
                    jump: i % 97 == 0,
                    punch: i % 131 == 0,
                    kick: false,
                };
                clips.tick(dt);
                black_box(controller.update(dt, &input, &level, &mut clips, &mut tf, &mut cam));
            }
            black_box(controller.physics().position);
        })
    });
}

/// Facing lookup across every direction mask.
fn bench_facing_lookup(c: &mut Criterion) {
    c.bench_function("facing_lookup_all_masks", |b| {
        b.iter(|| {
            for bits in 0..16u8 {
                black_box(facing_yaw(black_box(DirectionKeys::from_bits_truncate(bits))));
            }
        })
    });
}

/// Parse and validate the shipped level files.
fn bench_level_load(c: &mut Criterion) {
    c.bench_function("level_load_from_dir", |b| {
        b.iter(|| black_box(level_loader::load_level_from_dir(level_loader::LEVEL_DIR)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_resolve_sweep,
        bench_controller_frames,
        bench_facing_lookup,
        bench_level_load
}
criterion_main!(benches);
