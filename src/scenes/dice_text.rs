use glam::Vec3;

use super::common::{base_scene, gradient_material, orbiting_rig, LabelSpec, TextLabels};
use super::ColorMode;
use crate::camera::AutoRotate;
use crate::frame::FrameInfo;
use crate::geometry::text::TextGeometry;
use crate::loaders::FontRequest;
use crate::math::{parse_hex, Gradient};
use crate::scene::{Material, Scene, Side};
use crate::traits::Visual;

/// Colours and coefficients selected by a [`ColorMode`]
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub lights: [u32; 3],
    pub gradient: Gradient,
    pub front: Material,
    pub side: Material,
}

impl Palette {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Blend => {
                let gradient = stops(&[
                    (0.0, "#0057ff"),
                    (0.25, "#6a00ff"),
                    (0.5, "#ff0080"),
                    (0.75, "#00c832"),
                    (1.0, "#0a1030"),
                ]);
                Self {
                    lights: [0x0046ff, 0xff0080, 0x00c832],
                    front: gradient_material(gradient.clone(), 0.85, 0.5, 0.3, Side::Front),
                    side: gradient_material(gradient.clone(), 0.7, 0.4, 0.4, Side::Back),
                    gradient,
                }
            }
            ColorMode::Contrast => {
                let gradient = stops(&[
                    (0.0, "#ffcc00"),
                    (0.33, "#ff9900"),
                    (0.66, "#00ffcc"),
                    (1.0, "#ffffff"),
                ]);
                Self {
                    lights: [0xffcc00, 0x00ffcc, 0xffffff],
                    front: gradient_material(gradient.clone(), 0.95, 0.8, 0.2, Side::Front),
                    side: gradient_material(gradient.clone(), 0.8, 0.7, 0.3, Side::Back),
                    gradient,
                }
            }
        }
    }
}

fn stops(entries: &[(f32, &str)]) -> Gradient {
    let parsed: Vec<(f32, [f32; 3])> = entries
        .iter()
        .filter_map(|(offset, hex)| parse_hex(hex).map(|c| (*offset, c)))
        .collect();
    Gradient::from_stops(&parsed)
}

/// Extruded "DICE" wordmark
pub struct DiceText {
    scene: Scene,
    mode: ColorMode,
    palette: Palette,
    labels: TextLabels,
}

impl DiceText {
    pub fn new(aspect: f32, mode: ColorMode) -> Self {
        let palette = Palette::for_mode(mode);
        let mut scene = base_scene(5.0, aspect, orbiting_rig(palette.lights, 1.0, 0.7, 5.0, 5.0));
        scene.auto_rotate = Some(AutoRotate::new(0.5));

        let labels = TextLabels::new(vec![LabelSpec {
            text: "DICE",
            geometry: TextGeometry::new(1.5, 0.4),
            position: Vec3::ZERO,
            wobble: None,
            materials: vec![palette.front.clone(), palette.side.clone()],
        }]);

        Self {
            scene,
            mode,
            palette,
            labels,
        }
    }

    pub fn with_font(mut self, request: FontRequest) -> Self {
        self.labels.start(request);
        self
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn labels(&self) -> &TextLabels {
        &self.labels
    }
}

impl Visual for DiceText {
    fn name(&self) -> &'static str {
        "dice"
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update(&mut self, frame: &FrameInfo) {
        self.labels.poll(&mut self.scene);
        self.scene.animate(frame.time, frame.delta);
    }

    fn font_state(&self) -> &'static str {
        self.labels.state().label()
    }
}
