//! Time-parameterised motion: light orbits, object spin, text wobble.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPlane {
    /// `x = sin(..)·r`, `y = cos(..)·r`, z stays at base
    XY,
    /// `x = sin(..)·r`, `z = cos(..)·r`, y stays at base
    XZ,
}

/// Circular path; coordinates outside the plane keep their base value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub plane: OrbitPlane,
    pub angular_speed: f32,
    pub phase: f32,
    pub radius: f32,
}

impl Orbit {
    pub fn new(plane: OrbitPlane, angular_speed: f32, phase: f32, radius: f32) -> Self {
        Self {
            plane,
            angular_speed,
            phase,
            radius,
        }
    }

    pub fn position(&self, base: Vec3, t: f32) -> Vec3 {
        let angle = t * self.angular_speed + self.phase;
        let (s, c) = angle.sin_cos();
        match self.plane {
            OrbitPlane::XY => Vec3::new(s * self.radius, c * self.radius, base.z),
            OrbitPlane::XZ => Vec3::new(s * self.radius, base.y, c * self.radius),
        }
    }
}

/// One rotation channel as a function of time
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AxisMotion {
    #[default]
    Still,
    /// `rate · t`
    Linear(f32),
    /// `sin(t · frequency) · amplitude`
    Sine { frequency: f32, amplitude: f32 },
}

impl AxisMotion {
    pub fn at(&self, t: f32) -> f32 {
        match *self {
            AxisMotion::Still => 0.0,
            AxisMotion::Linear(rate) => t * rate,
            AxisMotion::Sine {
                frequency,
                amplitude,
            } => (t * frequency).sin() * amplitude,
        }
    }
}

/// Euler rotation driven independently per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spin {
    pub axes: [AxisMotion; 3],
}

impl Spin {
    pub fn new(x: AxisMotion, y: AxisMotion, z: AxisMotion) -> Self {
        Self { axes: [x, y, z] }
    }

    pub fn rotation(&self, t: f32) -> Vec3 {
        Vec3::new(self.axes[0].at(t), self.axes[1].at(t), self.axes[2].at(t))
    }
}

/// Small oscillation around a fixed tilt (x and y only)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    pub base: Vec3,
    pub phase: f32,
    pub amplitude: f32,
    pub frequencies: (f32, f32),
}

impl Wobble {
    pub fn new(base: Vec3, phase: f32) -> Self {
        Self {
            base,
            phase,
            amplitude: 0.5_f32.to_radians(),
            frequencies: (0.3, 0.2),
        }
    }

    pub fn rotation(&self, t: f32) -> Vec3 {
        Vec3::new(
            self.base.x + (t * self.frequencies.0 + self.phase).sin() * self.amplitude,
            self.base.y + (t * self.frequencies.1 + self.phase).sin() * self.amplitude,
            self.base.z,
        )
    }
}
