//! Triangle meshes as plain CPU arrays.
//!
//! A [`Geometry`] is always indexed. Generators that conceptually produce
//! "soup" (polyhedra, extruded caps) just emit sequential indices, so normal
//! recomputation treats every path the same way.

pub mod primitives;
pub mod text;
pub mod triangulate;

use glam::{Mat3, Quat, Vec2, Vec3};

use crate::math::AABB;

/// Index range drawn with one material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    /// Empty means one implicit group covering all indices with material 0
    pub groups: Vec<GeometryGroup>,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Draw groups, synthesizing the implicit one when none were declared
    pub fn draw_groups(&self) -> Vec<GeometryGroup> {
        if self.groups.is_empty() {
            vec![GeometryGroup {
                start: 0,
                count: self.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            self.groups.clone()
        }
    }

    pub fn bounding_box(&self) -> Option<AABB> {
        AABB::from_points(&self.positions)
    }

    /// Recompute smooth per-vertex normals from the current positions.
    ///
    /// Face normals (area weighted, via the unnormalized cross product) are
    /// accumulated into each referenced vertex and normalized. Previous
    /// normals are discarded entirely.
    pub fn compute_vertex_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if a >= self.positions.len() || b >= self.positions.len() || c >= self.positions.len() {
                continue;
            }
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.apply_rotation(Quat::from_rotation_z(angle))
    }

    fn apply_rotation(&mut self, rotation: Quat) -> &mut Self {
        let m = Mat3::from_quat(rotation);
        for p in &mut self.positions {
            *p = m * *p;
        }
        for n in &mut self.normals {
            *n = (m * *n).normalize_or_zero();
        }
        self
    }

    pub fn translate(&mut self, offset: Vec3) -> &mut Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    pub fn scale(&mut self, factor: Vec3) -> &mut Self {
        for p in &mut self.positions {
            *p *= factor;
        }
        self
    }

    /// Move the bounding-box center to the origin
    pub fn center(&mut self) -> &mut Self {
        if let Some(bounds) = self.bounding_box() {
            self.translate(-bounds.center());
        }
        self
    }

    /// Append another geometry, re-basing its indices and groups
    pub fn merge(&mut self, other: &Geometry) {
        let base = self.positions.len() as u32;
        let index_base = self.indices.len() as u32;

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + base));

        if !other.groups.is_empty() || !self.groups.is_empty() {
            if self.groups.is_empty() && index_base > 0 {
                self.groups.push(GeometryGroup {
                    start: 0,
                    count: index_base,
                    material_index: 0,
                });
            }
            for group in other.draw_groups() {
                self.push_group(index_base + group.start, group.count, group.material_index);
            }
        }
    }

    /// Add a group, extending the previous one when contiguous with the same material
    pub fn push_group(&mut self, start: u32, count: u32, material_index: usize) {
        if count == 0 {
            return;
        }
        if let Some(last) = self.groups.last_mut() {
            if last.material_index == material_index && last.start + last.count == start {
                last.count += count;
                return;
            }
        }
        self.groups.push(GeometryGroup {
            start,
            count,
            material_index,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Geometry {
        Geometry {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::X; 4],
            uvs: vec![Vec2::ZERO; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
            groups: Vec::new(),
        }
    }

    #[test]
    fn normals_follow_ccw_winding() {
        let mut g = quad();
        g.compute_vertex_normals();
        for n in &g.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn normals_replace_stale_values() {
        let mut g = quad();
        g.normals = vec![Vec3::new(0.0, -1.0, 0.0); 4];
        g.compute_vertex_normals();
        assert!(g.normals.iter().all(|n| n.z > 0.99));
    }

    #[test]
    fn center_moves_bounds_to_origin() {
        let mut g = quad();
        g.center();
        let bounds = g.bounding_box().unwrap();
        assert!(bounds.center().length() < 1e-6);
    }

    #[test]
    fn rotate_z_quarter_turn() {
        let mut g = quad();
        g.rotate_z(std::f32::consts::FRAC_PI_2);
        assert!((g.positions[1] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn implicit_group_covers_all_indices() {
        let g = quad();
        let groups = g.draw_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 6);
    }

    #[test]
    fn merge_rebases_indices() {
        let mut a = quad();
        let b = quad();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 8);
        assert_eq!(&a.indices[6..9], &[4, 5, 6]);
    }

    #[test]
    fn push_group_coalesces_contiguous_ranges() {
        let mut g = Geometry::default();
        g.push_group(0, 6, 0);
        g.push_group(6, 3, 0);
        g.push_group(9, 12, 1);
        assert_eq!(g.groups.len(), 2);
        assert_eq!(g.groups[0].count, 9);
        assert_eq!(g.groups[1].material_index, 1);
    }
}
