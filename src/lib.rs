pub mod animation;
pub mod camera;
pub mod cli;
pub mod core;
pub mod frame;
pub mod geometry;
pub mod loaders;
pub mod math;
pub mod postprocess;
pub mod render;
pub mod renderer;
pub mod scene;
pub mod scenes;
pub mod stage;
pub mod traits;
pub mod types;

pub use scenes::{create_visual, ColorMode, VisualKind};
pub use stage::Stage;
