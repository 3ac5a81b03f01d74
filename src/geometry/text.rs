//! Extruded text meshes built from a [`Typeface`]

use glam::{Vec2, Vec3};

use super::triangulate::{contains_point, is_clockwise, signed_area, triangulate};
use super::Geometry;
use crate::loaders::Typeface;

/// Material slot used for the front and back caps
pub const CAP_MATERIAL: usize = 0;
/// Material slot used for the extruded side walls
pub const SIDE_MATERIAL: usize = 1;

/// A filled region: CCW outer contour plus CW holes
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub contour: Vec<Vec2>,
    pub holes: Vec<Vec<Vec2>>,
}

/// Group one glyph's contours into shapes by containment depth.
///
/// Contours nested an even number of times are solids, odd ones are holes
/// of the smallest solid that encloses them. Orientation in the source
/// font is ignored.
pub fn shapes_from_contours(contours: &[Vec<Vec2>]) -> Vec<Shape> {
    let areas: Vec<f32> = contours.iter().map(|c| signed_area(c).abs()).collect();
    let encloses = |outer: usize, inner: usize| {
        outer != inner
            && areas[outer] > areas[inner]
            && contours[inner]
                .first()
                .is_some_and(|p| contains_point(&contours[outer], *p))
    };

    let depth: Vec<usize> = (0..contours.len())
        .map(|i| (0..contours.len()).filter(|&j| encloses(j, i)).count())
        .collect();

    let mut shapes: Vec<(usize, Shape)> = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        if depth[i] % 2 == 0 {
            let mut contour = contour.clone();
            if is_clockwise(&contour) {
                contour.reverse();
            }
            shapes.push((i, Shape { contour, holes: Vec::new() }));
        }
    }

    for (i, hole) in contours.iter().enumerate() {
        if depth[i] % 2 == 0 {
            continue;
        }
        let owner = shapes
            .iter_mut()
            .filter(|(s, _)| encloses(*s, i))
            .min_by(|(a, _), (b, _)| areas[*a].total_cmp(&areas[*b]));
        if let Some((_, shape)) = owner {
            let mut hole = hole.clone();
            if !is_clockwise(&hole) {
                hole.reverse();
            }
            shape.holes.push(hole);
        }
    }

    shapes.into_iter().map(|(_, shape)| shape).collect()
}

/// Text extrusion options.
///
/// Caps land in material group 0 and side walls in group 1; the result is
/// centred on the origin. Bevels are not generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextGeometry {
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
}

impl Default for TextGeometry {
    fn default() -> Self {
        Self {
            size: 100.0,
            depth: 50.0,
            curve_segments: 12,
        }
    }
}

impl TextGeometry {
    pub fn new(size: f32, depth: f32) -> Self {
        Self {
            size,
            depth,
            ..Self::default()
        }
    }

    pub fn build(&self, font: &Typeface, text: &str) -> Geometry {
        let shapes: Vec<Shape> = font
            .layout(text, self.size, self.curve_segments)
            .iter()
            .flat_map(|glyph| shapes_from_contours(glyph))
            .collect();
        self.extrude(&shapes)
    }

    /// Extrude arbitrary shapes along +Z from 0 to `depth`, then centre
    pub fn extrude(&self, shapes: &[Shape]) -> Geometry {
        let (min, max) = shapes
            .iter()
            .flat_map(|s| s.contour.iter())
            .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));
        let uv_of = |p: Vec2| (p - min) / extent;

        let mut caps = Geometry::default();
        let mut sides = Geometry::default();

        for shape in shapes {
            let mut outline: Vec<Vec2> = shape.contour.clone();
            for hole in &shape.holes {
                outline.extend_from_slice(hole);
            }

            for tri in triangulate(&shape.contour, &shape.holes) {
                let [a, b, c] = tri.map(|i| outline[i as usize]);
                // back cap faces -Z, front cap faces +Z
                push_triangle(&mut caps, [c, b, a], 0.0, uv_of);
                push_triangle(&mut caps, [a, b, c], self.depth, uv_of);
            }

            push_walls(&mut sides, &shape.contour, self.depth, uv_of);
            for hole in &shape.holes {
                push_walls(&mut sides, hole, self.depth, uv_of);
            }
        }

        let mut geometry = caps;
        geometry.push_group(0, geometry.indices.len() as u32, CAP_MATERIAL);
        let side_start = geometry.indices.len() as u32;
        let base = geometry.positions.len() as u32;
        geometry.positions.extend_from_slice(&sides.positions);
        geometry.uvs.extend_from_slice(&sides.uvs);
        geometry.indices.extend(sides.indices.iter().map(|i| i + base));
        geometry.push_group(side_start, sides.indices.len() as u32, SIDE_MATERIAL);

        geometry.compute_vertex_normals();
        geometry.center();
        geometry
    }
}

fn push_triangle(g: &mut Geometry, points: [Vec2; 3], z: f32, uv_of: impl Fn(Vec2) -> Vec2) {
    for p in points {
        g.indices.push(g.positions.len() as u32);
        g.positions.push(Vec3::new(p.x, p.y, z));
        g.uvs.push(uv_of(p));
    }
}

/// One quad per contour edge, wound so the face normal points away from
/// the filled side (outward for CCW outlines, inward for CW holes)
fn push_walls(g: &mut Geometry, contour: &[Vec2], depth: f32, uv_of: impl Fn(Vec2) -> Vec2 + Copy) {
    let n = contour.len();
    for i in 0..n {
        let prev = contour[(i + n - 1) % n];
        let cur = contour[i];
        let a = Vec3::new(prev.x, prev.y, 0.0);
        let b = Vec3::new(cur.x, cur.y, 0.0);
        let c = Vec3::new(cur.x, cur.y, depth);
        let d = Vec3::new(prev.x, prev.y, depth);
        for (p, flat) in [(a, prev), (b, cur), (d, prev), (b, cur), (c, cur), (d, prev)] {
            g.indices.push(g.positions.len() as u32);
            g.positions.push(p);
            g.uvs.push(uv_of(flat));
        }
    }
}
