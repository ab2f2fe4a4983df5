/// Camera and projection utilities
use nalgebra::Vector3;

use crate::error::{Error, Result};
use crate::mat4::Mat4;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Field of view and clip planes shared by both projection modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    pub mode: ProjectionMode,
    /// Vertical field of view in radians (perspective only).
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Lens {
    /// Create the projection matrix.
    ///
    /// `extent` is the visible height of the orthographic box; the
    /// perspective lens ignores it.
    pub fn projection_matrix(&self, aspect: f32, extent: f32) -> Result<Mat4> {
        match self.mode {
            ProjectionMode::Perspective => Mat4::perspective(self.fov, aspect, self.near, self.far),
            ProjectionMode::Orthographic => {
                if !(aspect > 0.0 && aspect.is_finite()) {
                    return Err(Error::invalid("aspect", aspect, "must be positive and finite"));
                }
                if !(extent > 0.0 && extent.is_finite()) {
                    return Err(Error::invalid("extent", extent, "must be positive and finite"));
                }
                if !(self.near > 0.0 && self.near.is_finite()) {
                    return Err(Error::invalid("near", self.near, "must be positive and finite"));
                }
                if !(self.far > self.near && self.far.is_finite()) {
                    return Err(Error::invalid("far", self.far, "must be finite and greater than near"));
                }
                let height = extent;
                let width = height * aspect;
                Mat4::orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fov: std::f32::consts::FRAC_PI_3,
            near: 1.0,
            far: 1000.0,
        }
    }
}

/// Explicitly placed camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Vector3<f32>, target: Vector3<f32>) -> Self {
        Self {
            position,
            target,
            up: Vector3::y(),
        }
    }

    /// Camera-to-world placement.
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.position, &self.target, &self.up)
    }

    /// World-to-camera transform: the inverse of the placement.
    pub fn view_matrix(&self) -> Mat4 {
        self.camera_matrix().invert()
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }
}

/// Camera circling a target about the world +Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Orbit angle in radians; 0 places the camera on the target's +Z side.
    pub angle: f32,
    pub radius: f32,
}

impl OrbitCamera {
    pub fn new(angle: f32, radius: f32) -> Self {
        Self { angle, radius }
    }

    /// Orbit placement: push out along +Z by `radius`, swing about Y,
    /// then move to the target.
    pub fn orbit_matrix(&self, target: &Vector3<f32>) -> Mat4 {
        Mat4::translation(0.0, 0.0, self.radius)
            * Mat4::rotation_y(self.angle)
            * Mat4::translation(target.x, target.y, target.z)
    }

    pub fn position(&self, target: &Vector3<f32>) -> Vector3<f32> {
        self.orbit_matrix(target).translation_part()
    }

    /// Concrete camera looking at `target` from the current orbit position.
    pub fn camera(&self, target: &Vector3<f32>) -> Camera {
        Camera::new(self.position(target), *target)
    }

    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(0.0, 300.0)
    }
}
