use super::display_context::DisplayContext;
use super::timer::FixedHz;

/// Output from a layer's render call - just pixels
#[derive(Debug, Clone)]
pub struct LayerOutput {
    /// RGBA pixel data
    pub pixels: Vec<u8>,
    /// Optional alpha mask (0.0 = transparent, 1.0 = opaque)
    pub alpha: Option<Vec<f32>>,
}

impl LayerOutput {
    /// Create output with fully opaque pixels
    pub fn opaque(pixels: Vec<u8>) -> Self {
        Self { pixels, alpha: None }
    }

    /// Create output with alpha mask
    pub fn with_alpha(pixels: Vec<u8>, alpha: Vec<f32>) -> Self {
        Self {
            pixels,
            alpha: Some(alpha),
        }
    }
}

/// Core layer logic - implemented by specific layers
pub trait LayerLogic: Clone {
    /// Update layer with time since its previous update
    fn update(&self, delta: f32) -> Self;

    /// Render at the resolution described by `context`
    fn render(&self, context: &DisplayContext) -> LayerOutput;
}

/// Layer that manages its own update timing with internal timer
#[derive(Debug, Clone)]
pub struct TimedLayer<T: LayerLogic> {
    logic: T,
    timer: FixedHz,
    pending: f32,
}

impl<T: LayerLogic> TimedLayer<T> {
    /// Create layer with specific update rate
    pub fn new(logic: T, hz: f32) -> Self {
        Self {
            logic,
            timer: FixedHz::new(hz),
            pending: 0.0,
        }
    }

    /// Get target Hz
    pub fn hz(&self) -> f32 {
        1.0 / self.timer.interval
    }

    pub fn logic(&self) -> &T {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut T {
        &mut self.logic
    }

    /// Advance the clock; returns true when the logic was updated
    pub fn update(&mut self, delta: f32) -> bool {
        self.pending += delta;
        if !self.timer.tick(delta) {
            return false;
        }
        self.logic = self.logic.update(self.pending);
        self.pending = 0.0;
        true
    }

    pub fn render(&self, context: &DisplayContext) -> LayerOutput {
        self.logic.render(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestLogic {
        value: u32,
        seen: f32,
    }

    impl LayerLogic for TestLogic {
        fn update(&self, delta: f32) -> Self {
            TestLogic {
                value: self.value + 1,
                seen: self.seen + delta,
            }
        }

        fn render(&self, _context: &DisplayContext) -> LayerOutput {
            LayerOutput::opaque(vec![self.value as u8; 4])
        }
    }

    #[test]
    fn timed_layer_throttles_updates() {
        let mut layer = TimedLayer::new(TestLogic { value: 0, seen: 0.0 }, 60.0);
        let ctx = DisplayContext::new(1, 1);

        // Small delta - should not update
        assert!(!layer.update(0.01));
        assert_eq!(layer.render(&ctx).pixels[0], 0);

        // Large delta - should update
        assert!(layer.update(0.02));
        assert_eq!(layer.render(&ctx).pixels[0], 1);
    }

    #[test]
    fn skipped_time_is_handed_to_the_logic() {
        let mut layer = TimedLayer::new(TestLogic { value: 0, seen: 0.0 }, 60.0);
        layer.update(0.01);
        layer.update(0.01);
        assert!((layer.logic().seen - 0.02).abs() < 1e-6);
        assert!((layer.hz() - 60.0).abs() < 1e-3);
    }
}
