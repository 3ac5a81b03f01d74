mod common;
pub mod dice_text;
pub mod floating_shapes;
pub mod morphing_shape;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use common::{orbiting_rig, LabelSpec, TextLabels, LIGHT_BASES};
pub use dice_text::{DiceText, Palette};
pub use floating_shapes::FloatingShapes;
pub use morphing_shape::MorphingShape;

use crate::loaders::FontLoader;
use crate::math::Simplex3;
use crate::traits::Visual;
use std::path::Path;

/// Which visual to mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VisualKind {
    /// Noise-displaced cylinder with name labels, bloom and shimmer
    #[default]
    Morphing,
    /// Extruded "DICE" wordmark
    Dice,
    /// Floating gradient shapes
    Shapes,
}

/// Palette selection for the DICE wordmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Softer, more transparent colours that match the backdrop
    #[default]
    Blend,
    /// Brighter, more metallic complementary colours
    Contrast,
}

/// Build a visual and kick off any font load it needs
pub fn create_visual(
    kind: VisualKind,
    color_mode: ColorMode,
    font: &Path,
    seed: u64,
    aspect: f32,
) -> Box<dyn Visual> {
    let noise = Simplex3::new(seed);
    match kind {
        VisualKind::Morphing => {
            Box::new(MorphingShape::new(aspect, noise).with_font(FontLoader::spawn(font)))
        }
        VisualKind::Dice => {
            Box::new(DiceText::new(aspect, color_mode).with_font(FontLoader::spawn(font)))
        }
        VisualKind::Shapes => Box::new(FloatingShapes::new(aspect, noise)),
    }
}
