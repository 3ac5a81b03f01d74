use approx::assert_abs_diff_eq;
use glam::Vec3;
use portfolio_visuals::animation::{displace, BaseMesh, DisplacementEngine, DisplacementParams};
use portfolio_visuals::geometry::primitives::cylinder;
use portfolio_visuals::math::Simplex3;

fn sample_points() -> Vec<Vec3> {
    (0..64)
        .map(|i| {
            let a = i as f32 * 0.37;
            Vec3::new(a.sin() * 0.5, (a * 0.3).cos() - 0.5, a.cos() * 0.5)
        })
        .collect()
}

#[cfg(test)]
mod displacement_tests {
    use super::*;

    #[test]
    fn test_displace_at_time_zero_matches_closed_form() {
        let noise = Simplex3::new(11);

        for p in sample_points() {
            let n1 = noise.sample(p.x * 1.5, p.y * 1.5, p.z * 1.5) * 0.15;
            let n2 = noise.sample(p.x * 2.0, p.y * 2.0, p.z * 2.0) * 0.1;
            let expected = p * (1.0 + n1 + n2 * (p.x * 2.0).sin());

            let actual = displace(p, 0.0, &noise);
            assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-6);
            assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-6);
            assert_abs_diff_eq!(actual.z, expected.z, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_displace_is_pure() {
        let noise = Simplex3::new(5);
        for p in sample_points() {
            assert_eq!(displace(p, 3.25, &noise), displace(p, 3.25, &noise));
        }
    }

    #[test]
    fn test_replaying_a_frame_reproduces_positions_exactly() {
        let engine = DisplacementEngine::new(Simplex3::new(2));
        let mut geometry = cylinder(0.5, 0.5, 2.0, 32, 32);
        let base = BaseMesh::capture(&geometry);

        engine.apply(&base, &mut geometry, 0.5);
        let first = geometry.positions.clone();
        engine.apply(&base, &mut geometry, 4.0);
        assert_ne!(geometry.positions, first);
        engine.apply(&base, &mut geometry, 0.5);

        assert_eq!(geometry.positions, first);
    }

    #[test]
    fn test_factor_stays_within_bounds() {
        let params = DisplacementParams::default();
        let noise = Simplex3::new(9);
        let (lo, hi) = params.factor_bounds();
        assert_abs_diff_eq!(lo, 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(hi, 1.25, epsilon = 1e-6);

        for (i, p) in sample_points().into_iter().enumerate() {
            let f = params.factor(p, i as f32 * 0.9, &noise);
            assert!((lo..=hi).contains(&f), "factor {f} out of range");
        }
    }

    #[test]
    fn test_recomputed_normals_are_unit_and_change() {
        let engine = DisplacementEngine::new(Simplex3::new(4));
        let mut geometry = cylinder(0.5, 0.5, 2.0, 32, 32);
        let base = BaseMesh::capture(&geometry);

        let mut rest = geometry.clone();
        rest.compute_vertex_normals();

        engine.apply(&base, &mut geometry, 2.0);

        assert_eq!(geometry.normals.len(), geometry.positions.len());
        for n in &geometry.normals {
            assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
        let changed = geometry
            .normals
            .iter()
            .zip(&rest.normals)
            .filter(|(a, b)| a.distance(**b) > 1e-3)
            .count();
        assert!(changed > 0);
    }

    #[test]
    fn test_custom_params_flatten_the_field() {
        let params = DisplacementParams {
            primary_amplitude: 0.0,
            secondary_amplitude: 0.0,
            ..DisplacementParams::default()
        };
        let engine = DisplacementEngine::new(Simplex3::new(1)).with_params(params);
        let p = Vec3::new(0.2, 0.4, -0.1);
        assert_eq!(engine.displace(p, 7.0), p);
    }
}
