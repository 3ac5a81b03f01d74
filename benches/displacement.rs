use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use portfolio_visuals::animation::{displace, BaseMesh, DisplacementEngine};
use portfolio_visuals::core::canvas_layer::BACKDROP_DOWNSCALE;
use portfolio_visuals::core::{BlobField, DisplayContext};
use portfolio_visuals::geometry::primitives::cylinder;
use portfolio_visuals::math::Simplex3;

/// Benchmark: single vertex displacement
fn bench_displace_point(c: &mut Criterion) {
    let noise = Simplex3::new(0);
    let p = Vec3::new(0.3, -0.7, 0.4);

    c.bench_function("displace_point", |b| {
        b.iter(|| black_box(displace(black_box(p), black_box(2.5), &noise)))
    });
}

/// Benchmark: per-frame displacement plus normal recomputation
fn bench_displace_cylinder(c: &mut Criterion) {
    let engine = DisplacementEngine::new(Simplex3::new(0));
    let mut group = c.benchmark_group("displace_cylinder");

    for segments in [16u32, 32, 64].iter() {
        let mut geometry = cylinder(0.5, 0.5, 2.0, *segments, *segments);
        let base = BaseMesh::capture(&geometry);
        let mut t = 0.0f32;

        group.bench_with_input(BenchmarkId::new("segments", segments), segments, |b, _| {
            b.iter(|| {
                t += 1.0 / 60.0;
                engine.apply(&base, &mut geometry, black_box(t));
            })
        });
    }
    group.finish();
}

/// Benchmark: normals alone on the 32x32 cylinder
fn bench_vertex_normals(c: &mut Criterion) {
    let mut geometry = cylinder(0.5, 0.5, 2.0, 32, 32);

    c.bench_function("compute_vertex_normals_32", |b| {
        b.iter(|| {
            geometry.compute_vertex_normals();
            black_box(geometry.normals.len())
        })
    });
}

/// Benchmark: CPU backdrop raster at 1/8 of 1280x800
fn bench_backdrop_paint(c: &mut Criterion) {
    let field = BlobField::new(1280.0, 800.0, 0);
    let ctx = DisplayContext::new(1280, 800).downscaled(BACKDROP_DOWNSCALE);

    c.bench_function("backdrop_paint", |b| {
        b.iter(|| black_box(field.paint(black_box(&ctx))))
    });
}

criterion_group!(
    benches,
    bench_displace_point,
    bench_displace_cylinder,
    bench_vertex_normals,
    bench_backdrop_paint
);
criterion_main!(benches);
