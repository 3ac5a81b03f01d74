use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::display_context::DisplayContext;
use super::layer::{LayerLogic, LayerOutput};

/// 2D drawing operations for canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill entire canvas with color (r, g, b, a)
    Clear(u8, u8, u8, u8),

    /// Radial gradient disc centred at (cx, cy), fading from `alpha` to 0 at `radius`
    RadialGradient { cx: f32, cy: f32, radius: f32, r: u8, g: u8, b: u8, alpha: f32 },
}

/// Canvas state - pixel buffer with draw operations
#[derive(Debug, Clone)]
pub struct Canvas {
    /// RGBA pixel buffer
    pixels: Vec<u8>,
    /// Alpha channel (0.0 = transparent, 1.0 = opaque)
    alpha: Vec<f32>,
    /// Pending draw operations
    operations: Vec<DrawOp>,
    /// Canvas dimensions
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = width as usize * height as usize;

        Self {
            pixels: vec![0; pixel_count * 4],
            alpha: vec![0.0; pixel_count],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Add draw operation - functional style
    pub fn draw(mut self, op: DrawOp) -> Self {
        self.operations.push(op);
        self
    }

    /// Execute all pending operations and return new canvas
    pub fn execute_ops(&self) -> Self {
        let mut canvas = Self {
            pixels: self.pixels.clone(),
            alpha: self.alpha.clone(),
            operations: Vec::new(),
            width: self.width,
            height: self.height,
        };

        for op in &self.operations {
            canvas.execute_op(op);
        }

        canvas
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Clear(r, g, b, a) => self.clear(*r, *g, *b, *a),
            DrawOp::RadialGradient { cx, cy, radius, r, g, b, alpha } => {
                self.fill_radial(*cx, *cy, *radius, [*r, *g, *b], *alpha)
            }
        }
    }

    fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let alpha_val = a as f32 / 255.0;

        for (pixel, alpha) in self.pixels.chunks_exact_mut(4).zip(&mut self.alpha) {
            pixel.copy_from_slice(&[r, g, b, a]);
            *alpha = alpha_val;
        }
    }

    /// Source-over blend of one colour onto a pixel
    fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], src_alpha: f32) {
        if x >= self.width || y >= self.height || src_alpha <= 0.0 {
            return;
        }

        let i = (y * self.width + x) as usize;
        let dst_alpha = self.alpha[i];
        let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

        let px = &mut self.pixels[i * 4..i * 4 + 4];
        for c in 0..3 {
            let src = rgb[c] as f32 * src_alpha;
            let dst = px[c] as f32 * dst_alpha * (1.0 - src_alpha);
            let value = if out_alpha > 0.0 { (src + dst) / out_alpha } else { 0.0 };
            px[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        px[3] = (out_alpha * 255.0).round() as u8;
        self.alpha[i] = out_alpha;
    }

    fn fill_radial(&mut self, cx: f32, cy: f32, radius: f32, rgb: [u8; 3], alpha: f32) {
        if radius <= 0.0 {
            return;
        }

        let x0 = (cx - radius).floor().max(0.0) as u32;
        let y0 = (cy - radius).floor().max(0.0) as u32;
        let x1 = ((cx + radius).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((cy + radius).ceil().max(0.0) as u32).min(self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                // Sample at pixel centres
                let d = Vec2::new(x as f32 + 0.5 - cx, y as f32 + 0.5 - cy).length();
                if d < radius {
                    self.blend(x, y, rgb, alpha * (1.0 - d / radius));
                }
            }
        }
    }

    /// Get pixel buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Get alpha buffer
    pub fn alpha(&self) -> &[f32] {
        &self.alpha
    }

    /// Get canvas dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Deep navy backdrop fill
pub const BACKDROP_FILL: [u8; 3] = [0x0a, 0x10, 0x30];

pub const BLOB_COLORS: [[u8; 3]; 6] = [
    [0, 20, 70],
    [0, 70, 255],
    [120, 0, 255],
    [255, 0, 128],
    [255, 50, 0],
    [0, 200, 50],
];

pub const BLOB_COUNT: usize = 6;
pub const BLOB_ALPHA: f32 = 0.7;

/// Blob radius range in logical pixels, half-open
pub const BLOB_RADIUS_MIN: f32 = 300.0;
pub const BLOB_RADIUS_MAX: f32 = 700.0;

/// Largest speed per axis, in logical pixels per 60 Hz frame
pub const BLOB_SPEED_MAX: f32 = 0.25;

/// Backdrop raster resolution divisor
pub const BACKDROP_DOWNSCALE: u32 = 8;

/// A soft coloured disc drifting across the backdrop, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub position: Vec2,
    pub radius: f32,
    /// Pixels per 60 Hz frame
    pub velocity: Vec2,
    pub color: [u8; 3],
}

impl Blob {
    /// Move, then flip any velocity component whose axis has left the viewport by more than the radius
    pub fn step(&mut self, frames: f32, bounds: Vec2) {
        self.position += self.velocity * frames;

        if self.position.x < -self.radius || self.position.x > bounds.x + self.radius {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < -self.radius || self.position.y > bounds.y + self.radius {
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// Drifting blob backdrop over a navy fill
#[derive(Debug, Clone)]
pub struct BlobField {
    blobs: Vec<Blob>,
    size: Vec2,
}

impl BlobField {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let blobs = (0..BLOB_COUNT)
            .map(|i| Blob {
                position: Vec2::new(
                    rng.gen_range(0.0..width.max(1.0)),
                    rng.gen_range(0.0..height.max(1.0)),
                ),
                radius: rng.gen_range(BLOB_RADIUS_MIN..BLOB_RADIUS_MAX),
                velocity: Vec2::new(
                    rng.gen_range(-BLOB_SPEED_MAX..BLOB_SPEED_MAX),
                    rng.gen_range(-BLOB_SPEED_MAX..BLOB_SPEED_MAX),
                ),
                color: BLOB_COLORS[i % BLOB_COLORS.len()],
            })
            .collect();

        Self {
            blobs,
            size: Vec2::new(width, height),
        }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Logical viewport size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Advance every blob by `delta` seconds
    pub fn step(&mut self, delta: f32) {
        let frames = delta * 60.0;
        for blob in &mut self.blobs {
            blob.step(frames, self.size);
        }
    }

    /// Draw the field onto a canvas of the context's size
    pub fn paint(&self, context: &DisplayContext) -> Canvas {
        let scale = if self.size.x > 0.0 {
            context.width as f32 / self.size.x
        } else {
            1.0
        };
        let [r, g, b] = BACKDROP_FILL;

        self.blobs
            .iter()
            .fold(
                Canvas::new(context.width, context.height).draw(DrawOp::Clear(r, g, b, 255)),
                |canvas, blob| {
                    let [r, g, b] = blob.color;
                    canvas.draw(DrawOp::RadialGradient {
                        cx: blob.position.x * scale,
                        cy: blob.position.y * scale,
                        radius: blob.radius * scale,
                        r,
                        g,
                        b,
                        alpha: BLOB_ALPHA,
                    })
                },
            )
            .execute_ops()
    }
}

impl LayerLogic for BlobField {
    fn update(&self, delta: f32) -> Self {
        let mut next = self.clone();
        next.step(delta);
        next
    }

    fn render(&self, context: &DisplayContext) -> LayerOutput {
        let canvas = self.paint(context);
        LayerOutput::with_alpha(canvas.pixels, canvas.alpha)
    }
}
