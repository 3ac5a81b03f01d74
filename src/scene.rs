//! CPU-side scene: meshes, materials, lights and the camera for one visual.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

use crate::animation::Orbit;
use crate::camera::{AutoRotate, Camera};
use crate::geometry::Geometry;
use crate::math::{hex_to_rgb, Gradient};
use crate::types::{FrameUniform, PointLightRaw};

/// Stable handle to an object inside its [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }

    /// Inverse-transpose of the upper 3x3, for transforming normals
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }
}

/// Which faces are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Linear-ish sRGB base colour, multiplied with the gradient when present
    pub color: [f32; 3],
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub gradient: Option<Gradient>,
    pub side: Side,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            gradient: None,
            side: Side::Front,
        }
    }
}

impl Material {
    pub fn transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    geometry: Geometry,
    pub materials: Vec<Material>,
    pub transform: Transform,
    revision: u64,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.into(),
            geometry,
            materials: vec![material],
            transform: Transform::default(),
            revision: 0,
        }
    }

    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable geometry access; marks the GPU copy stale
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        self.revision += 1;
        &mut self.geometry
    }

    /// Bumped on every geometry mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_transparent(&self) -> bool {
        self.materials.iter().any(Material::transparent)
    }

    /// Material for a draw group, falling back to the first slot
    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index).or_else(|| self.materials.first())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Position the light shines from, towards the origin
    pub position: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            position: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub distance: f32,
    pub position: Vec3,
}

impl PointLight {
    pub fn new(hex: u32, position: Vec3) -> Self {
        Self {
            color: hex_to_rgb(hex),
            intensity: 2.0,
            distance: 100.0,
            position,
        }
    }

    pub fn to_raw(&self) -> PointLightRaw {
        PointLightRaw {
            position: self.position.to_array(),
            intensity: self.intensity,
            color: self.color,
            distance: self.distance,
        }
    }
}

/// Three point lights, each moving along its own orbit
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub lights: [PointLight; 3],
    bases: [Vec3; 3],
    pub orbits: [Orbit; 3],
}

impl LightRig {
    pub fn new(lights: [PointLight; 3], orbits: [Orbit; 3]) -> Self {
        let bases = lights.map(|l| l.position);
        Self {
            lights,
            bases,
            orbits,
        }
    }

    #[cfg(test)]
    pub(crate) fn bases(&self) -> &[Vec3; 3] {
        &self.bases
    }

    pub fn update(&mut self, t: f32) {
        for ((light, orbit), base) in self.lights.iter_mut().zip(&self.orbits).zip(&self.bases) {
            light.position = orbit.position(*base, t);
        }
    }

    pub fn colors(&self) -> [[f32; 3]; 3] {
        self.lights.map(|l| l.color)
    }
}

/// Everything one visual draws
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub rig: LightRig,
    pub camera: Camera,
    pub auto_rotate: Option<AutoRotate>,
}

impl Scene {
    pub fn new(camera: Camera, rig: LightRig) -> Self {
        Self {
            objects: Vec::new(),
            ambient: AmbientLight::default(),
            directional: DirectionalLight::default(),
            rig,
            camera,
            auto_rotate: None,
        }
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.geometry.vertex_count()).sum()
    }

    /// Opaque objects in insertion order, then transparent ones back to front
    pub fn draw_order(&self) -> Vec<ObjectId> {
        let view = self.camera.view();
        let (mut transparent, opaque): (Vec<_>, Vec<_>) = self
            .objects
            .iter()
            .enumerate()
            .partition(|(_, o)| o.is_transparent());

        // View space looks down -z, so the most negative z is farthest
        let depth = |o: &SceneObject| view.transform_point3(o.transform.position).z;
        transparent.sort_by(|(_, a), (_, b)| depth(a).total_cmp(&depth(b)));

        opaque
            .into_iter()
            .chain(transparent)
            .map(|(i, _)| ObjectId(i))
            .collect()
    }

    /// Per-frame camera rig and light orbits
    pub fn animate(&mut self, t: f32, delta: f32) {
        if let Some(spin) = self.auto_rotate {
            spin.update(&mut self.camera, delta);
        }
        self.rig.update(t);
    }

    pub fn frame_uniform(&self, time: f32) -> FrameUniform {
        let dir = self.directional.position.normalize_or_zero();
        FrameUniform {
            camera: self.camera.to_uniform(time),
            ambient: [
                self.ambient.color[0],
                self.ambient.color[1],
                self.ambient.color[2],
                self.ambient.intensity,
            ],
            directional_dir: [dir.x, dir.y, dir.z, self.directional.intensity],
            directional_color: [
                self.directional.color[0],
                self.directional.color[1],
                self.directional.color[2],
                1.0,
            ],
            points: self.rig.lights.map(|l| l.to_raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::OrbitPlane;
    use approx::assert_relative_eq;

    fn rig() -> LightRig {
        LightRig::new(
            [
                PointLight::new(0x0046ff, Vec3::new(5.0, 5.0, 5.0)),
                PointLight::new(0xff0080, Vec3::new(-5.0, -5.0, 5.0)),
                PointLight::new(0x00c832, Vec3::new(0.0, 8.0, -5.0)),
            ],
            [
                Orbit::new(OrbitPlane::XY, 0.5, 0.0, 5.0),
                Orbit::new(OrbitPlane::XY, 0.5, std::f32::consts::PI, 5.0),
                Orbit::new(OrbitPlane::XZ, 0.3, 0.0, 5.0),
            ],
        )
    }

    #[test]
    fn geometry_mut_bumps_revision() {
        let mut obj = SceneObject::new("mesh", Geometry::default(), Material::default());
        assert_eq!(obj.revision(), 0);
        obj.geometry_mut();
        obj.geometry_mut();
        assert_eq!(obj.revision(), 2);
    }

    #[test]
    fn rig_keeps_bases_and_moves_lights() {
        let mut rig = rig();
        rig.update(1.0);
        assert_eq!(rig.bases()[0], Vec3::new(5.0, 5.0, 5.0));
        assert_relative_eq!(rig.lights[0].position.x, 0.5f32.sin() * 5.0);
        assert_eq!(rig.lights[2].position.y, 8.0);
    }

    #[test]
    fn transform_matrix_applies_scale_then_rotation() {
        let t = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let p = t.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn transparent_objects_draw_last_far_to_near() {
        let mut scene = Scene::new(Camera::on_z(5.0, 1.0), rig());
        let glass = Material {
            opacity: 0.5,
            ..Material::default()
        };
        let near = scene.add(
            SceneObject::new("near", Geometry::default(), glass.clone())
                .with_transform(Transform::at(Vec3::new(0.0, 0.0, 2.0))),
        );
        let solid = scene.add(SceneObject::new("solid", Geometry::default(), Material::default()));
        let far = scene.add(
            SceneObject::new("far", Geometry::default(), glass)
                .with_transform(Transform::at(Vec3::new(0.0, 0.0, -3.0))),
        );

        assert_eq!(scene.draw_order(), vec![solid, far, near]);
    }

    #[test]
    fn material_falls_back_to_first_slot() {
        let obj = SceneObject::new("mesh", Geometry::default(), Material::default());
        assert!(obj.material(3).is_some());
    }
}
