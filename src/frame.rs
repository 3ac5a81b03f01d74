/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the animation started, never decreasing
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }

    /// A lone frame at time `t`, as seen by a freshly mounted visual
    pub fn at(t: f32) -> Self {
        Self::new(0, t, 0.0)
    }
}
