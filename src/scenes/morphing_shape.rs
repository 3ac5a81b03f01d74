use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use super::common::{base_scene, gradient_material, orbiting_rig, LabelSpec, TextLabels};
use crate::animation::{AxisMotion, BaseMesh, DisplacementEngine, Spin, Wobble};
use crate::camera::AutoRotate;
use crate::frame::FrameInfo;
use crate::geometry::primitives::cylinder;
use crate::geometry::text::TextGeometry;
use crate::loaders::FontRequest;
use crate::math::{Gradient, Simplex3};
use crate::postprocess::{BloomSettings, PostProcessSettings, ShimmerSettings};
use crate::scene::{ObjectId, Scene, SceneObject, Side, Transform};
use crate::traits::Visual;

pub const SHAPE_COLORS: [&str; 4] = ["#0046ff", "#7800ff", "#ff0080", "#00c832"];
pub const LABEL_COLORS: [&str; 4] = ["#ffcc00", "#ff9900", "#00ffcc", "#ffffff"];
pub const LIGHT_COLORS: [u32; 3] = [0x0046ff, 0xff0080, 0x00c832];

/// Noise-displaced cylinder with two floating name labels
pub struct MorphingShape {
    scene: Scene,
    shape: ObjectId,
    base: BaseMesh,
    engine: DisplacementEngine,
    spin: Spin,
    labels: TextLabels,
}

impl MorphingShape {
    pub fn new(aspect: f32, noise: Simplex3) -> Self {
        let mut scene = base_scene(5.0, aspect, orbiting_rig(LIGHT_COLORS, 0.5, 0.3, 5.0, 5.0));
        scene.auto_rotate = Some(AutoRotate::new(0.3));

        let mut geometry = cylinder(0.5, 0.5, 2.0, 32, 32);
        geometry.rotate_z(FRAC_PI_2);
        let base = BaseMesh::capture(&geometry);

        let material = gradient_material(Gradient::evenly(&SHAPE_COLORS), 0.7, 0.2, 0.3, Side::Double);
        let shape = scene.add(
            SceneObject::new("morphing-shape", geometry, material)
                .with_transform(Transform::default().with_scale(0.7)),
        );

        let label_material =
            gradient_material(Gradient::evenly(&LABEL_COLORS), 0.9, 0.5, 0.2, Side::Front);
        let label = |text, position, tilt: (f32, f32), phase| LabelSpec {
            text,
            geometry: TextGeometry::new(0.3, 0.02),
            position,
            wobble: Some(Wobble::new(
                Vec3::new(tilt.0.to_radians(), tilt.1.to_radians(), 0.0),
                phase,
            )),
            materials: vec![label_material.clone()],
        };
        let labels = TextLabels::new(vec![
            label("Matthew", Vec3::new(-0.1, 0.2, 0.5), (1.0, 1.5), 0.0),
            label("Price", Vec3::new(0.1, -0.2, 0.5), (1.0, -1.0), 1.0),
        ]);

        Self {
            scene,
            shape,
            base,
            engine: DisplacementEngine::new(noise),
            spin: Spin::new(
                AxisMotion::Linear(0.1),
                AxisMotion::Linear(0.15),
                AxisMotion::Sine {
                    frequency: 0.1,
                    amplitude: 0.05,
                },
            ),
            labels,
        }
    }

    /// Begin the asynchronous font load for the labels
    pub fn with_font(mut self, request: FontRequest) -> Self {
        self.labels.start(request);
        self
    }

    pub fn shape_id(&self) -> ObjectId {
        self.shape
    }

    pub fn base_mesh(&self) -> &BaseMesh {
        &self.base
    }

    pub fn engine(&self) -> &DisplacementEngine {
        &self.engine
    }

    pub fn labels(&self) -> &TextLabels {
        &self.labels
    }
}

impl Visual for MorphingShape {
    fn name(&self) -> &'static str {
        "morphing"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update(&mut self, frame: &FrameInfo) {
        self.labels.poll(&mut self.scene);

        let t = frame.time;
        if let Some(shape) = self.scene.object_mut(self.shape) {
            self.engine.apply(&self.base, shape.geometry_mut(), t);
            shape.transform.rotation = self.spin.rotation(t);
        }
        self.scene.animate(t, frame.delta);
        self.labels.animate(&mut self.scene, t);
    }

    fn post_process(&self) -> Option<PostProcessSettings> {
        Some(PostProcessSettings {
            bloom: BloomSettings {
                strength: 0.5,
                radius: 0.4,
                threshold: 0.85,
            },
            shimmer: ShimmerSettings { intensity: 0.1 },
        })
    }

    fn font_state(&self) -> &'static str {
        self.labels.state().label()
    }
}
