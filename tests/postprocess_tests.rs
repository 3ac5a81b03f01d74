use approx::assert_abs_diff_eq;
use portfolio_visuals::postprocess::{
    apply_shimmer, bright_pass, gaussian_weights, lerp_bloom_factor, shimmer_offset,
    PostProcessSettings, BLOOM_FACTORS, KERNEL_RADII, MIP_LEVELS,
};

#[cfg(test)]
mod postprocess_tests {
    use super::*;

    #[test]
    fn test_shimmer_contribution_is_bounded() {
        let pixel = [0.4, 0.5, 0.6, 0.8];
        for i in 0..40 {
            for j in 0..40 {
                let (u, v) = (i as f32 / 39.0, j as f32 / 39.0);
                let t = (i * 40 + j) as f32 * 0.173;
                let out = apply_shimmer(pixel, u, v, t, 0.1);
                for c in 0..3 {
                    assert!((out[c] - pixel[c]).abs() <= 0.03 + 1e-6);
                }
                assert_eq!(out[3], pixel[3]);
            }
        }
    }

    #[test]
    fn test_shimmer_adds_the_same_amount_to_every_channel() {
        let out = apply_shimmer([0.1, 0.2, 0.3, 1.0], 0.25, 0.6, 1.5, 0.1);
        assert_abs_diff_eq!(out[0] - 0.1, out[1] - 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(out[1] - 0.2, out[2] - 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_shimmer_vanishes_at_zero_intensity() {
        assert_eq!(shimmer_offset(0.3, 0.7, 12.0, 0.0), 0.0);
    }

    #[test]
    fn test_bright_pass_threshold() {
        assert_eq!(bright_pass([0.2, 0.2, 0.2, 1.0], 0.85), [0.0; 4]);
        assert_eq!(bright_pass([2.0, 2.0, 2.0, 1.0], 0.85), [2.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_bloom_factor_mirrors_with_radius() {
        assert_abs_diff_eq!(lerp_bloom_factor(1.0, 0.0), 1.0);
        assert_abs_diff_eq!(lerp_bloom_factor(1.0, 1.0), 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(lerp_bloom_factor(0.2, 1.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_kernel_per_level() {
        assert_eq!(KERNEL_RADII.len(), MIP_LEVELS);
        assert_eq!(BLOOM_FACTORS.len(), MIP_LEVELS);
        for radius in KERNEL_RADII {
            let weights = gaussian_weights(radius);
            assert_eq!(weights.len(), radius as usize);
            assert!(weights.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = PostProcessSettings::default();
        assert_eq!(settings.bloom.strength, 0.5);
        assert_eq!(settings.bloom.radius, 0.4);
        assert_eq!(settings.bloom.threshold, 0.85);
        assert_eq!(settings.shimmer.intensity, 0.1);
    }
}
