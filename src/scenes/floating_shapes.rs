use glam::Vec3;

use super::common::{base_scene, gradient_material, orbiting_rig};
use crate::animation::{AxisMotion, Spin};
use crate::camera::AutoRotate;
use crate::frame::FrameInfo;
use crate::geometry::primitives::{icosahedron, octahedron, torus_knot};
use crate::geometry::Geometry;
use crate::math::{Gradient, Simplex3};
use crate::scene::{Material, ObjectId, Scene, SceneObject, Side, Transform};
use crate::traits::Visual;

const LIGHT_COLORS: [u32; 3] = [0x0046ff, 0xff0080, 0x00c832];

fn shape_material(colors: &[&str]) -> Material {
    gradient_material(Gradient::evenly(colors), 0.7, 0.3, 0.2, Side::Double)
}

/// Scale every vertex by `1 + noise(p * 0.1) * 0.5`, once
pub fn distort(geometry: &mut Geometry, noise: &Simplex3) {
    for p in &mut geometry.positions {
        let n = noise.sample(p.x * 0.1, p.y * 0.1, p.z * 0.1) * 0.5;
        *p *= 1.0 + n;
    }
    geometry.compute_vertex_normals();
}

/// Torus knot, lumpy icosahedron and octahedron turning slowly
pub struct FloatingShapes {
    scene: Scene,
    shapes: Vec<(ObjectId, Spin)>,
}

impl FloatingShapes {
    pub fn new(aspect: f32, noise: Simplex3) -> Self {
        let mut scene = base_scene(20.0, aspect, orbiting_rig(LIGHT_COLORS, 0.5, 0.3, 10.0, 8.0));
        scene.auto_rotate = Some(AutoRotate::new(0.5));

        let knot = scene.add(SceneObject::new(
            "torus-knot",
            torus_knot(5.0, 1.5, 200, 32, 3, 7),
            shape_material(&["#0046ff", "#7800ff", "#ff0080"]),
        ));

        let mut ico = icosahedron(4.0, 4);
        distort(&mut ico, &noise);
        let ico = scene.add(
            SceneObject::new("icosahedron", ico, shape_material(&["#7800ff", "#ff0080", "#ff3200"]))
                .with_transform(Transform::at(Vec3::new(-10.0, -5.0, -5.0))),
        );

        let octa = scene.add(
            SceneObject::new(
                "octahedron",
                octahedron(3.0, 2),
                shape_material(&["#0046ff", "#00c832", "#ff3200"]),
            )
            .with_transform(Transform::at(Vec3::new(10.0, 5.0, -5.0))),
        );

        let turn = |x: f32, y: f32| Spin::new(AxisMotion::Linear(x), AxisMotion::Linear(y), AxisMotion::Still);
        Self {
            scene,
            shapes: vec![
                (knot, turn(0.2, 0.1)),
                (ico, turn(-0.15, -0.1)),
                (octa, turn(0.1, 0.2)),
            ],
        }
    }
}

impl Visual for FloatingShapes {
    fn name(&self) -> &'static str {
        "shapes"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update(&mut self, frame: &FrameInfo) {
        for (id, spin) in &self.shapes {
            if let Some(object) = self.scene.object_mut(*id) {
                object.transform.rotation = spin.rotation(frame.time);
            }
        }
        self.scene.animate(frame.time, frame.delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_shapes_with_their_own_lights() {
        let visual = FloatingShapes::new(1.0, Simplex3::new(0));
        assert_eq!(visual.scene().len(), 3);
        assert_eq!(visual.scene().rig.orbits[0].radius, 10.0);
        assert_eq!(visual.scene().rig.orbits[2].radius, 8.0);
        assert!(visual.post_process().is_none());
    }

    #[test]
    fn distortion_stays_within_half_radius() {
        let mut ico = icosahedron(4.0, 1);
        distort(&mut ico, &Simplex3::new(5));
        for p in &ico.positions {
            let r = p.length();
            assert!((2.0 - 1e-4..=6.0 + 1e-4).contains(&r));
        }
    }
}
