//! Per-frame noise displacement of a mesh from its rest pose.

use glam::Vec3;

use crate::geometry::Geometry;
use crate::math::Simplex3;

/// Rest-pose vertex positions, captured once and never mutated.
#[derive(Debug, Clone)]
pub struct BaseMesh {
    positions: Box<[Vec3]>,
}

impl BaseMesh {
    pub fn capture(geometry: &Geometry) -> Self {
        Self {
            positions: geometry.positions.clone().into_boxed_slice(),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Tuning constants for the two layered noise fields.
///
/// These were tuned by eye; treat them as opaque.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementParams {
    pub primary_frequency: f32,
    pub primary_drift: (f32, f32),
    pub primary_amplitude: f32,
    pub secondary_frequency: f32,
    pub secondary_drift: (f32, f32),
    pub secondary_amplitude: f32,
    pub modulation_speed: f32,
    pub modulation_frequency: f32,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            primary_frequency: 1.5,
            primary_drift: (0.2, 0.1),
            primary_amplitude: 0.15,
            secondary_frequency: 2.0,
            secondary_drift: (-0.15, 0.25),
            secondary_amplitude: 0.1,
            modulation_speed: 0.5,
            modulation_frequency: 2.0,
        }
    }
}

impl DisplacementParams {
    /// Radial scale factor at `p` and time `t`
    pub fn factor(&self, p: Vec3, t: f32, noise: &Simplex3) -> f32 {
        let f1 = self.primary_frequency;
        let n1 = noise.sample(
            p.x * f1 + t * self.primary_drift.0,
            p.y * f1 + t * self.primary_drift.1,
            p.z * f1,
        ) * self.primary_amplitude;

        let f2 = self.secondary_frequency;
        let n2 = noise.sample(
            p.x * f2 + t * self.secondary_drift.0,
            p.y * f2 + t * self.secondary_drift.1,
            p.z * f2,
        ) * self.secondary_amplitude;

        1.0 + n1 + n2 * (t * self.modulation_speed + p.x * self.modulation_frequency).sin()
    }

    /// Smallest and largest factor reachable with noise in [-1, 1]
    pub fn factor_bounds(&self) -> (f32, f32) {
        let reach = self.primary_amplitude.abs() + self.secondary_amplitude.abs();
        (1.0 - reach, 1.0 + reach)
    }
}

/// Displace one rest position with the default parameters
pub fn displace(p: Vec3, t: f32, noise: &Simplex3) -> Vec3 {
    p * DisplacementParams::default().factor(p, t, noise)
}

#[derive(Debug, Clone, Default)]
pub struct DisplacementEngine {
    pub params: DisplacementParams,
    noise: Simplex3,
}

impl DisplacementEngine {
    pub fn new(noise: Simplex3) -> Self {
        Self {
            params: DisplacementParams::default(),
            noise,
        }
    }

    pub fn with_params(mut self, params: DisplacementParams) -> Self {
        self.params = params;
        self
    }

    pub fn displace(&self, p: Vec3, t: f32) -> Vec3 {
        p * self.params.factor(p, t, &self.noise)
    }

    /// Rewrite every position of `target` from `base` at time `t`, then
    /// recompute normals from scratch.
    pub fn apply(&self, base: &BaseMesh, target: &mut Geometry, t: f32) {
        debug_assert_eq!(
            base.len(),
            target.positions.len(),
            "base mesh and displaced geometry disagree on vertex count"
        );

        for (out, &p) in target.positions.iter_mut().zip(base.positions()) {
            *out = self.displace(p, t);
        }
        target.compute_vertex_normals();
    }
}
