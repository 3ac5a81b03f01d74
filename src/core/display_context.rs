/// Display context - contains rendering dimensions and metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Reduced-resolution context, rounding up so nothing is cropped
    pub fn downscaled(&self, factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            width: self.width.div_ceil(factor).max(1),
            height: self.height.div_ceil(factor).max(1),
        }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total size in bytes for RGBA buffer
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_rgba() {
        let ctx = DisplayContext::new(100, 100);
        assert_eq!(ctx.pixel_count(), 10_000);
        assert_eq!(ctx.buffer_size(), 40_000);
    }

    #[test]
    fn test_downscale_rounds_up() {
        let ctx = DisplayContext::new(1281, 800).downscaled(8);
        assert_eq!(ctx, DisplayContext::new(161, 100));
    }

    #[test]
    fn test_downscale_never_zero() {
        let ctx = DisplayContext::new(3, 3).downscaled(8);
        assert_eq!((ctx.width, ctx.height), (1, 1));
    }
}
