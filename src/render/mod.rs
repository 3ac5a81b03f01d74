pub mod backdrop;
pub mod hud;
pub mod present;
pub mod targets;

pub use backdrop::BackdropRenderer;
pub use hud::{Hud, HudStats};
pub use present::Presenter;
pub use targets::RenderTarget;
