/// Anything that owns pixel-sized buffers tied to the viewport
pub trait ResizeTarget {
    /// Recreate buffers at the given physical size (both at least 1)
    fn resize_buffers(&mut self, width: u32, height: u32);

    /// Current physical buffer size
    fn buffer_size(&self) -> (u32, u32);
}
