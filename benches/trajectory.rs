use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DVec3, Vec3};
use pose_recorder::camera::CameraParams;
use pose_recorder::core::MeshRenderer;
use pose_recorder::math::{format_traj_number, pose_to_transform};
use pose_recorder::motion::integrate;
use pose_recorder::trajectory::serialize_transform;
use pose_recorder::traits::RenderBackend;
use pose_recorder::types::{Material, MeshScene, Triangle};
use pose_recorder::{AgentPose, Command};

/// Benchmark: formatting a single trajectory number
fn bench_format_number(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_number");

    for value in [0.0, 0.1, -123.456789, 6.02214076e23] {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &v| {
            b.iter(|| black_box(format_traj_number(black_box(v))))
        });
    }

    group.finish();
}

/// Benchmark: one full 16-token trajectory line
fn bench_serialize_transform(c: &mut Criterion) {
    let transform = pose_to_transform(DVec3::new(1.25, 1.5, -3.75), 35.0);

    c.bench_function("serialize_transform", |b| {
        b.iter(|| black_box(serialize_transform(black_box(&transform))))
    });
}

/// Benchmark: integrating action batches of growing length
fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate");
    let pattern = [
        Command::MoveForward,
        Command::TurnLeft,
        Command::StrafeRight,
        Command::MoveUp,
        Command::TurnRight,
        Command::MoveBackward,
    ];

    for count in [1usize, 10, 100, 1000].iter() {
        let commands: Vec<Command> = pattern.iter().copied().cycle().take(*count).collect();
        group.bench_with_input(BenchmarkId::new("commands", count), count, |b, _| {
            b.iter(|| black_box(integrate(black_box(AgentPose::default()), &commands)))
        });
    }

    group.finish();
}

/// Benchmark: rendering a small frame of a box room
fn bench_observe(c: &mut Criterion) {
    let corners = [
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(-5.0, 0.0, 5.0),
    ];
    let up = Vec3::Y * 3.0;
    let mut triangles = Vec::new();
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        triangles.push(Triangle::new(a, b, b + up, i as u32));
        triangles.push(Triangle::new(a, b + up, a + up, i as u32));
    }
    let scene = MeshScene {
        triangles,
        materials: vec![
            Material::new_color([0.8, 0.2, 0.2, 1.0]),
            Material::new_color([0.2, 0.8, 0.2, 1.0]),
            Material::new_color([0.2, 0.2, 0.8, 1.0]),
            Material::new_color([0.8, 0.8, 0.2, 1.0]),
        ],
    };
    let params = CameraParams {
        w: 160,
        h: 90,
        fx: 80.0,
        fy: 80.0,
        cx: 79.5,
        cy: 44.5,
        ..CameraParams::default()
    };
    let mut renderer = MeshRenderer::new(scene, params);
    let pose = AgentPose::from_array([0.0, 1.5, 0.0], 30.0);

    c.bench_function("observe_160x90", |b| {
        b.iter(|| black_box(renderer.observe(black_box(&pose))))
    });
}

criterion_group!(
    benches,
    bench_format_number,
    bench_serialize_transform,
    bench_integrate,
    bench_observe
);
criterion_main!(benches);
