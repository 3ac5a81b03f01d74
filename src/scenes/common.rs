use glam::Vec3;
use std::f32::consts::PI;

use crate::animation::{Orbit, OrbitPlane, Wobble};
use crate::camera::Camera;
use crate::geometry::text::TextGeometry;
use crate::loaders::{FontRequest, TextState, Typeface};
use crate::math::{hex_to_rgb, Gradient};
use crate::scene::{LightRig, Material, ObjectId, PointLight, Scene, SceneObject, Side, Transform};

/// Base positions shared by every visual's three point lights
pub const LIGHT_BASES: [Vec3; 3] = [
    Vec3::new(5.0, 5.0, 5.0),
    Vec3::new(-5.0, -5.0, 5.0),
    Vec3::new(0.0, 8.0, -5.0),
];

/// Lights 1 and 2 circle the XY plane half a turn apart, light 3 the XZ plane
pub fn orbiting_rig(colors: [u32; 3], speed: f32, speed3: f32, radius: f32, radius3: f32) -> LightRig {
    LightRig::new(
        [
            PointLight::new(colors[0], LIGHT_BASES[0]),
            PointLight::new(colors[1], LIGHT_BASES[1]),
            PointLight::new(colors[2], LIGHT_BASES[2]),
        ],
        [
            Orbit::new(OrbitPlane::XY, speed, 0.0, radius),
            Orbit::new(OrbitPlane::XY, speed, PI, radius),
            Orbit::new(OrbitPlane::XZ, speed3, 0.0, radius3),
        ],
    )
}

pub fn base_scene(camera_distance: f32, aspect: f32, rig: LightRig) -> Scene {
    Scene::new(Camera::on_z(camera_distance, aspect), rig)
}

/// Translucent gradient-mapped material with a white base colour
pub fn gradient_material(gradient: Gradient, opacity: f32, metalness: f32, roughness: f32, side: Side) -> Material {
    Material {
        color: hex_to_rgb(0xffffff),
        opacity,
        metalness,
        roughness,
        gradient: Some(gradient),
        side,
    }
}

/// A text mesh to create once the font is available
#[derive(Debug, Clone)]
pub struct LabelSpec {
    pub text: &'static str,
    pub geometry: TextGeometry,
    pub position: Vec3,
    pub wobble: Option<Wobble>,
    pub materials: Vec<Material>,
}

/// Font-gated text labels.
///
/// Meshes are added to the scene exactly once, on the frame the font
/// arrives; until then (or forever, if loading fails) nothing is touched.
#[derive(Debug, Default)]
pub struct TextLabels {
    state: TextState,
    specs: Vec<LabelSpec>,
    placed: Vec<(ObjectId, Option<Wobble>)>,
}

impl TextLabels {
    pub fn new(specs: Vec<LabelSpec>) -> Self {
        Self {
            state: TextState::Uninitialized,
            specs,
            placed: Vec::new(),
        }
    }

    pub fn start(&mut self, request: FontRequest) {
        self.state.start(request);
    }

    pub fn state(&self) -> &TextState {
        &self.state
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.placed.iter().map(|(id, _)| *id)
    }

    /// Poll the font and add meshes if it just became ready
    pub fn poll(&mut self, scene: &mut Scene) -> bool {
        match self.state.poll() {
            Some(font) => {
                self.place(scene, &font);
                true
            }
            None => false,
        }
    }

    fn place(&mut self, scene: &mut Scene, font: &Typeface) {
        for spec in self.specs.drain(..) {
            let geometry = spec.geometry.build(font, spec.text);
            let mut transform = Transform::at(spec.position);
            if let Some(wobble) = spec.wobble {
                transform.rotation = wobble.base;
            }
            let object = SceneObject::new(spec.text, geometry, Material::default())
                .with_materials(spec.materials)
                .with_transform(transform);
            let id = scene.add(object);
            log::debug!("added text label {:?}", spec.text);
            self.placed.push((id, spec.wobble));
        }
    }

    /// Wobble placed labels; a no-op before the font is ready
    pub fn animate(&self, scene: &mut Scene, t: f32) {
        for (id, wobble) in &self.placed {
            if let (Some(wobble), Some(object)) = (wobble, scene.object_mut(*id)) {
                object.transform.rotation = wobble.rotation(t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_lights_stay_opposite() {
        let mut rig = orbiting_rig([0xff0000, 0x00ff00, 0x0000ff], 0.5, 0.3, 5.0, 5.0);
        for i in 0..50 {
            rig.update(i as f32 * 0.7);
            let (a, b) = (rig.lights[0].position, rig.lights[1].position);
            assert!((a.x + b.x).abs() < 1e-4);
            assert!((a.y + b.y).abs() < 1e-4);
        }
    }

    #[test]
    fn labels_do_nothing_without_a_font() {
        let mut scene = base_scene(5.0, 1.0, orbiting_rig([0; 3], 1.0, 1.0, 5.0, 5.0));
        let mut labels = TextLabels::default();
        assert!(!labels.poll(&mut scene));
        labels.animate(&mut scene, 1.0);
        assert!(scene.is_empty());
    }
}
