//! Parametric mesh generators (cylinder, torus knot, subdivided polyhedra)

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::Geometry;

/// Capped cylinder along Y, centred on the origin.
///
/// Vertex layout: `(height_segments + 1) * (radial_segments + 1)` torso
/// vertices followed by the top and bottom caps, each with `radial_segments`
/// centre vertices plus `radial_segments + 1` rim vertices.
pub fn cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> Geometry {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;

    let mut g = Geometry::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(rows as usize + 1);

    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(radial as usize + 1);
        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * TAU;
            let (sin, cos) = theta.sin_cos();

            row.push(g.positions.len() as u32);
            g.positions
                .push(Vec3::new(radius * sin, -v * height + half, radius * cos));
            g.normals.push(Vec3::new(sin, slope, cos).normalize());
            g.uvs.push(Vec2::new(u, 1.0 - v));
        }
        grid.push(row);
    }

    for x in 0..radial as usize {
        for y in 0..rows as usize {
            let a = grid[y][x];
            let b = grid[y + 1][x];
            let c = grid[y + 1][x + 1];
            let d = grid[y][x + 1];
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    push_cap(&mut g, radius_top, half, radial, true);
    push_cap(&mut g, radius_bottom, half, radial, false);
    g
}

fn push_cap(g: &mut Geometry, radius: f32, half: f32, radial: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vec3::new(0.0, sign, 0.0);

    let centre_start = g.positions.len() as u32;
    for _ in 0..radial {
        g.positions.push(Vec3::new(0.0, half * sign, 0.0));
        g.normals.push(normal);
        g.uvs.push(Vec2::splat(0.5));
    }

    let rim_start = g.positions.len() as u32;
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        g.positions
            .push(Vec3::new(radius * sin, half * sign, radius * cos));
        g.normals.push(normal);
        g.uvs
            .push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5));
    }

    for x in 0..radial {
        let c = centre_start + x;
        let i = rim_start + x;
        if top {
            g.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            g.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/// (p, q) torus knot swept with a circular tube
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);

    let knot = |u: f32| {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * u.sin() * 0.5,
            radius * qu_over_p.sin() * 0.5,
        )
    };

    let mut g = Geometry::default();
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = knot(u);
        let p2 = knot(u + 0.01);

        // Frenet-like frame along the curve
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize_or_zero();
        let n = b.cross(t).normalize_or_zero();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let vertex = p1 + n * cx + b * cy;

            g.positions.push(vertex);
            g.normals.push((vertex - p1).normalize_or_zero());
            g.uvs
                .push(Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32));
        }
    }

    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            g.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    g
}

const ICOSAHEDRON_INDICES: [u32; 60] = [
    0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1,
    8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
];

const OCTAHEDRON_INDICES: [u32; 24] = [
    0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, 1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
];

pub fn icosahedron(radius: f32, detail: u32) -> Geometry {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let vertices = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    polyhedron(&vertices, &ICOSAHEDRON_INDICES, radius, detail)
}

pub fn octahedron(radius: f32, detail: u32) -> Geometry {
    let vertices = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    polyhedron(&vertices, &OCTAHEDRON_INDICES, radius, detail)
}

/// Subdivide every face `detail` times and project onto a sphere of `radius`.
///
/// The result is non-shared (three vertices per triangle) with smooth
/// spherical normals, `20 * (detail + 1)^2` triangles for an icosahedron.
pub fn polyhedron(vertices: &[Vec3], indices: &[u32], radius: f32, detail: u32) -> Geometry {
    let mut soup: Vec<Vec3> = Vec::new();
    for face in indices.chunks_exact(3) {
        let (a, b, c) = (
            vertices[face[0] as usize],
            vertices[face[1] as usize],
            vertices[face[2] as usize],
        );
        subdivide_face(&mut soup, a, b, c, detail);
    }

    let mut g = Geometry::default();
    for p in soup {
        let p = p.normalize() * radius;
        g.uvs.push(spherical_uv(p));
        g.normals.push(p.normalize_or_zero());
        g.positions.push(p);
    }
    g.indices = (0..g.positions.len() as u32).collect();
    g
}

fn subdivide_face(out: &mut Vec<Vec3>, a: Vec3, b: Vec3, c: Vec3, detail: u32) {
    let cols = detail as usize + 1;
    let mut v: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);

    for i in 0..=cols {
        let f = i as f32 / cols as f32;
        let aj = a.lerp(c, f);
        let bj = b.lerp(c, f);
        let rows = cols - i;
        let row = (0..=rows)
            .map(|j| {
                if j == 0 && i == cols {
                    aj
                } else {
                    aj.lerp(bj, j as f32 / rows as f32)
                }
            })
            .collect();
        v.push(row);
    }

    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend_from_slice(&[v[i][k + 1], v[i + 1][k], v[i][k]]);
            } else {
                out.extend_from_slice(&[v[i][k + 1], v[i + 1][k + 1], v[i + 1][k]]);
            }
        }
    }
}

fn spherical_uv(p: Vec3) -> Vec2 {
    let azimuth = p.z.atan2(-p.x);
    let inclination = (-p.y).atan2((p.x * p.x + p.z * p.z).sqrt());
    Vec2::new(azimuth / TAU + 0.5, 1.0 - (inclination / PI + 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_vertex_count() {
        let g = cylinder(0.5, 0.5, 2.0, 32, 32);
        assert_eq!(g.vertex_count(), 33 * 33 + 2 * (32 + 33));
        assert_eq!(g.normals.len(), g.vertex_count());
        assert_eq!(g.triangle_count(), 32 * 32 * 2 + 2 * 32);
    }

    #[test]
    fn cylinder_spans_height_and_radius() {
        let g = cylinder(0.5, 0.5, 2.0, 16, 4);
        let bounds = g.bounding_box().unwrap();
        assert!((bounds.min.y + 1.0).abs() < 1e-6);
        assert!((bounds.max.y - 1.0).abs() < 1e-6);
        assert!((bounds.max.x - 0.5).abs() < 1e-3);
    }

    #[test]
    fn cylinder_torso_normals_point_outward() {
        let g = cylinder(1.0, 1.0, 1.0, 8, 1);
        for (p, n) in g.positions.iter().zip(&g.normals).take(18) {
            let radial = Vec3::new(p.x, 0.0, p.z);
            assert!(radial.dot(*n) > 0.0);
        }
    }

    #[test]
    fn icosahedron_triangle_count() {
        let g = icosahedron(4.0, 4);
        assert_eq!(g.triangle_count(), 20 * 25);
        for p in &g.positions {
            assert!((p.length() - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn octahedron_faces_wind_outward() {
        let mut g = octahedron(3.0, 2);
        assert_eq!(g.triangle_count(), 8 * 9);
        g.compute_vertex_normals();
        for (p, n) in g.positions.iter().zip(&g.normals) {
            assert!(p.dot(*n) > 0.0);
        }
    }

    #[test]
    fn torus_knot_grid_size() {
        let g = torus_knot(5.0, 1.5, 200, 32, 3, 7);
        assert_eq!(g.vertex_count(), 201 * 33);
        assert_eq!(g.triangle_count(), 200 * 32 * 2);
        assert!(g.positions.iter().all(|p| p.is_finite()));
    }
}
