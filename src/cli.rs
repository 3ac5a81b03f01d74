// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::scenes::{ColorMode, VisualKind};

pub const DEFAULT_FONT_PATH: &str = "assets/fonts/block.typeface.json";
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 800;

#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio-visuals")]
#[command(about = "Animated portfolio visuals", long_about = None)]
pub struct Cli {
    /// Which visual to show
    #[arg(long, value_enum, default_value_t = VisualKind::Morphing)]
    pub visual: VisualKind,

    /// Palette for the DICE wordmark
    #[arg(long = "color-mode", value_enum, default_value_t = ColorMode::Blend)]
    pub color_mode: ColorMode,

    /// Typeface JSON used for text labels
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    pub font: PathBuf,

    /// Skip the animated blob backdrop
    #[arg(long = "no-backdrop", default_value = "false")]
    pub no_backdrop: bool,

    /// Disable the diagnostics overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Seed for the noise field and backdrop layout
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

impl Cli {
    pub fn stage_config(&self) -> StageConfig {
        StageConfig {
            visual: self.visual,
            color_mode: self.color_mode,
            font: self.font.clone(),
            seed: self.seed,
            backdrop: !self.no_backdrop,
            hud: !self.no_ui,
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }
}

/// Everything a stage needs to mount a visual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub visual: VisualKind,
    pub color_mode: ColorMode,
    pub font: PathBuf,
    pub seed: u32,
    pub backdrop: bool,
    pub hud: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            visual: VisualKind::default(),
            color_mode: ColorMode::default(),
            font: PathBuf::from(DEFAULT_FONT_PATH),
            seed: 0,
            backdrop: true,
            hud: true,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}
