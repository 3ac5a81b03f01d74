use crate::frame::FrameInfo;

/// Frame timing and iteration abstraction
pub trait FrameSource: Iterator<Item = FrameInfo> {
    /// Elapsed seconds of the most recent frame
    fn elapsed(&self) -> f32;

    /// Get the total number of frames produced
    fn frame_count(&self) -> u64;
}
