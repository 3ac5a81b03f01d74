use crate::frame::FrameInfo;
use crate::postprocess::PostProcessSettings;
use crate::scene::Scene;

/// A mountable animated visual that owns its scene
pub trait Visual {
    /// Short identifier shown in logs and the HUD
    fn name(&self) -> &'static str;

    fn scene(&self) -> &Scene;

    fn scene_mut(&mut self) -> &mut Scene;

    /// Advance all animation to `frame.time`. Called once per frame before
    /// rendering; pending font loads are polled here too.
    fn update(&mut self, frame: &FrameInfo);

    /// Post-processing passes, `None` to present the scene directly
    fn post_process(&self) -> Option<PostProcessSettings> {
        None
    }

    /// Font state label for diagnostics
    fn font_state(&self) -> &'static str {
        "none"
    }
}
