use glam::{Mat4, Quat, Vec3};
use std::f32::consts::TAU;

use crate::types::CameraUniform;

pub const DEFAULT_FOV_Y_DEGREES: f32 = 75.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera looking at a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: DEFAULT_FOV_Y_DEGREES,
            aspect,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }

    /// Camera on the +Z axis at `distance`, looking at the origin
    pub fn on_z(distance: f32, aspect: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, distance), aspect)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed projection with a [0, 1] depth range
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn to_uniform(&self, time: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            position: self.position.to_array(),
            time,
        }
    }
}

/// Turntable rotation of the camera around its target's vertical axis.
///
/// `speed` 1.0 is one full turn per minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoRotate {
    pub speed: f32,
}

impl AutoRotate {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Radians turned over `delta` seconds
    pub fn angle(&self, delta: f32) -> f32 {
        TAU / 60.0 * self.speed * delta
    }

    pub fn update(&self, camera: &mut Camera, delta: f32) {
        let offset = camera.position - camera.target;
        let rotated = Quat::from_rotation_y(-self.angle(delta)) * offset;
        camera.position = camera.target + rotated;
    }
}
