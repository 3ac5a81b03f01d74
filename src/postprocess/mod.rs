//! Bloom and shimmer post-processing.
//!
//! The GPU chain lives in [`pipeline`]; the functions here are the CPU
//! reference of the same math, used for kernel weights and in tests.

pub mod pipeline;

pub use pipeline::PostProcessor;

/// Number of blur levels, each at half the previous resolution
pub const MIP_LEVELS: usize = 5;
/// Gaussian kernel radius per level
pub const KERNEL_RADII: [u32; MIP_LEVELS] = [3, 5, 7, 9, 11];
/// Base contribution of each level before radius interpolation
pub const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];
/// Width of the smoothstep edge above the luminance threshold
pub const BRIGHT_PASS_SMOOTH_WIDTH: f32 = 0.01;
/// Shimmer is added to each channel scaled by this
pub const SHIMMER_GAIN: f32 = 0.3;
/// Largest blur kernel radius the blur uniform can carry
pub const MAX_KERNEL_RADIUS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 0.5,
            radius: 0.4,
            threshold: 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerSettings {
    pub intensity: f32,
}

impl Default for ShimmerSettings {
    fn default() -> Self {
        Self { intensity: 0.1 }
    }
}

/// Passes a visual asks for, applied in order bloom then shimmer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PostProcessSettings {
    pub bloom: BloomSettings,
    pub shimmer: ShimmerSettings,
}

/// Rec. 601 luma
pub fn luminance(rgb: [f32; 3]) -> f32 {
    0.299 * rgb[0] + 0.587 * rgb[1] + 0.114 * rgb[2]
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bright-pass filter: keeps colours whose luminance clears the threshold
pub fn bright_pass(rgba: [f32; 4], threshold: f32) -> [f32; 4] {
    let keep = smoothstep(
        threshold,
        threshold + BRIGHT_PASS_SMOOTH_WIDTH,
        luminance([rgba[0], rgba[1], rgba[2]]),
    );
    rgba.map(|c| c * keep)
}

/// Per-level weight: `mix(factor, 1.2 - factor, radius)`
pub fn lerp_bloom_factor(factor: f32, radius: f32) -> f32 {
    let mirror = 1.2 - factor;
    factor + (mirror - factor) * radius
}

/// Gaussian weights for offsets `0..radius` with `sigma = radius`.
/// Unnormalised; the blur shader divides by the weight sum.
pub fn gaussian_weights(radius: u32) -> Vec<f32> {
    let sigma = radius.max(1) as f32;
    (0..radius.max(1))
        .map(|i| {
            let x = i as f32;
            0.39894 * (-0.5 * x * x / (sigma * sigma)).exp() / sigma
        })
        .collect()
}

/// Signed shimmer offset at screen uv and time `t`
pub fn shimmer_offset(u: f32, v: f32, t: f32, intensity: f32) -> f32 {
    (u * 30.0 + t).sin() * (v * 30.0 + t * 0.7).sin() * intensity
}

/// Shimmer applied to one pixel; alpha passes through
pub fn apply_shimmer(rgba: [f32; 4], u: f32, v: f32, t: f32, intensity: f32) -> [f32; 4] {
    let add = shimmer_offset(u, v, t, intensity) * SHIMMER_GAIN;
    [rgba[0] + add, rgba[1] + add, rgba[2] + add, rgba[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bright_pass_cuts_below_threshold() {
        assert_eq!(bright_pass([0.5, 0.5, 0.5, 1.0], 0.85), [0.0; 4]);
        assert_eq!(bright_pass([1.0, 1.0, 1.0, 1.0], 0.85), [1.0; 4]);
    }

    #[test]
    fn bloom_factor_mirrors_with_radius() {
        assert_eq!(lerp_bloom_factor(1.0, 0.0), 1.0);
        assert!((lerp_bloom_factor(1.0, 1.0) - 0.2).abs() < 1e-6);
        assert!((lerp_bloom_factor(0.6, 0.4) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn gaussian_weights_decay() {
        let w = gaussian_weights(5);
        assert_eq!(w.len(), 5);
        assert!(w.windows(2).all(|p| p[0] > p[1]));
        assert!(gaussian_weights(11).len() <= MAX_KERNEL_RADIUS);
    }

    #[test]
    fn shimmer_keeps_alpha() {
        let out = apply_shimmer([0.2, 0.4, 0.6, 0.37], 0.1, 0.2, 3.0, 0.1);
        assert_eq!(out[3], 0.37);
    }
}
