use crate::camera::Camera;
use crate::traits::ResizeTarget;

/// Device pixel ratio ceiling; denser displays render at 2x and get scaled
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical viewport size plus the display's scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// From a physical size as reported by winit
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(width as f64 / scale, height as f64 / scale, scale)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width >= 1.0 && self.height >= 1.0)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.scale_factor.clamp(f64::MIN_POSITIVE, MAX_PIXEL_RATIO)
    }

    /// Render buffer size in physical pixels, never zero
    pub fn buffer_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.width * ratio).round() as u32).max(1),
            ((self.height * ratio).round() as u32).max(1),
        )
    }

    /// Swapchain size: the full physical window size, each side clamped to
    /// `max_dimension`. Larger than `buffer_size` once the ratio is capped;
    /// the final pass scales the render buffers up to it.
    pub fn surface_size(&self, max_dimension: u32) -> (u32, u32) {
        let scale = self.scale_factor.max(f64::MIN_POSITIVE);
        let limit = max_dimension.max(1);
        (
            ((self.width * scale).round() as u32).clamp(1, limit),
            ((self.height * scale).round() as u32).clamp(1, limit),
        )
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }
}

/// Fans a viewport change out to the camera and every buffer owner.
///
/// Detached after teardown, at which point every call is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeAdapter {
    attached: bool,
    current: Option<Viewport>,
}

impl Default for ResizeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeAdapter {
    pub fn new() -> Self {
        Self {
            attached: true,
            current: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn current(&self) -> Option<Viewport> {
        self.current
    }

    /// Apply `viewport`; returns whether anything was resized
    pub fn resize(
        &mut self,
        viewport: Viewport,
        camera: &mut Camera,
        targets: &mut [&mut dyn ResizeTarget],
    ) -> bool {
        if !self.attached || viewport.is_empty() {
            return false;
        }

        let (width, height) = viewport.buffer_size();
        camera.set_aspect(viewport.aspect());
        for target in targets.iter_mut() {
            target.resize_buffers(width, height);
        }
        self.current = Some(viewport);

        log::debug!(
            "resized to {}x{} logical, {}x{} buffers (ratio {})",
            viewport.width,
            viewport.height,
            width,
            height,
            viewport.pixel_ratio()
        );
        true
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size_applies_capped_ratio() {
        assert_eq!(Viewport::new(800.0, 600.0, 1.0).buffer_size(), (800, 600));
        assert_eq!(Viewport::new(800.0, 600.0, 1.5).buffer_size(), (1200, 900));
        assert_eq!(Viewport::new(800.0, 600.0, 3.0).buffer_size(), (1600, 1200));
    }

    #[test]
    fn from_physical_recovers_logical_size() {
        let v = Viewport::from_physical(2400, 1800, 3.0);
        assert_eq!((v.width, v.height), (800.0, 600.0));
        assert_eq!(v.buffer_size(), (1600, 1200));
    }

    #[test]
    fn surface_keeps_full_physical_size_above_cap() {
        let v = Viewport::from_physical(2400, 1800, 3.0);
        assert_eq!(v.surface_size(8192), (2400, 1800));
        assert_eq!(v.buffer_size(), (1600, 1200));
    }

    #[test]
    fn surface_matches_buffers_below_cap() {
        let v = Viewport::from_physical(1202, 902, 1.5);
        assert_eq!(v.surface_size(8192), v.buffer_size());
    }

    #[test]
    fn surface_is_clamped_to_device_limit() {
        let v = Viewport::new(3000.0, 1000.0, 3.0);
        assert_eq!(v.surface_size(8192), (8192, 3000));
        assert_eq!(Viewport::new(0.2, 0.2, 1.0).surface_size(8192), (1, 1));
    }

    #[test]
    fn zero_area_is_ignored() {
        let mut adapter = ResizeAdapter::new();
        let mut camera = Camera::on_z(5.0, 1.0);
        assert!(!adapter.resize(Viewport::new(0.0, 600.0, 1.0), &mut camera, &mut []));
        assert_eq!(camera.aspect, 1.0);
        assert!(adapter.current().is_none());
    }
}
