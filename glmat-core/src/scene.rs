/// Scene parameters and the per-frame composition of transforms
use std::f32::consts::{PI, TAU};

use nalgebra::Vector3;
use tracing::trace;

use crate::camera::{Lens, OrbitCamera, ProjectionMode};
use crate::error::Result;
use crate::mat3::Mat3;
use crate::mat4::Mat4;

/// Order in which the per-axis rotations are composed into the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationOrder {
    /// `scale × X × Y × Z × translate`
    #[default]
    Xyz,
    /// `scale × Z × Y × X × translate`
    Zyx,
}

/// Rotation-speed of the animated Y spin, in radians per millisecond.
pub const SPIN_RATE: f32 = 0.005;

/// Everything one 3D frame is built from.
///
/// The defaults are the values the F demo starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub angle_x: f32,
    pub angle_y: f32,
    pub angle_z: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub scale_z: f32,
    pub lens: Lens,
    pub camera: Option<OrbitCamera>,
    pub rotation_order: RotationOrder,
    pub animate: bool,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: -360.0,
            angle_x: PI / 16.0,
            angle_y: PI * 0.8,
            angle_z: PI,
            scale_x: 1.0,
            scale_y: 1.0,
            scale_z: 1.0,
            lens: Lens::default(),
            camera: None,
            rotation_order: RotationOrder::Xyz,
            animate: true,
        }
    }
}

impl SceneParams {
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.angle_x += dx;
        self.angle_y += dy;
        self.angle_z += dz;
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Advance the Y spin by `dt_ms`. Once past a full turn the angle
    /// resets to zero on the following step.
    pub fn advance(&mut self, dt_ms: f32) {
        if !self.animate {
            return;
        }
        self.angle_y = if self.angle_y > TAU {
            0.0
        } else {
            self.angle_y + SPIN_RATE * dt_ms
        };
    }

    pub fn rotation_matrix(&self) -> Mat4 {
        let rx = Mat4::rotation_x(self.angle_x);
        let ry = Mat4::rotation_y(self.angle_y);
        let rz = Mat4::rotation_z(self.angle_z);
        match self.rotation_order {
            RotationOrder::Xyz => rx * ry * rz,
            RotationOrder::Zyx => rz * ry * rx,
        }
    }

    /// Object-to-world: scale, then rotate, then translate.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::scaling(self.scale_x, self.scale_y, self.scale_z)
            * self.rotation_matrix()
            * Mat4::translation(self.x, self.y, self.z)
    }

    /// World-to-camera, when an orbit camera is configured.
    pub fn view_matrix(&self) -> Option<Mat4> {
        self.camera
            .map(|orbit| orbit.camera(&self.position()).view_matrix())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Result<Mat4> {
        let extent = match self.camera {
            Some(orbit) => orbit.radius,
            None => self.z.abs(),
        };
        self.lens.projection_matrix(aspect, extent)
    }

    /// `model × view × projection`, the single matrix uploaded per draw.
    pub fn frame_matrix(&self, aspect: f32) -> Result<Mat4> {
        let projection = self.projection_matrix(aspect)?;
        let model = self.model_matrix();
        Ok(match self.view_matrix() {
            Some(view) => model * view * projection,
            None => model * projection,
        })
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.lens.mode = mode;
    }

    /// Turn the orbit camera on (with defaults) or off.
    pub fn toggle_camera(&mut self) {
        self.camera = match self.camera {
            Some(_) => None,
            None => Some(OrbitCamera::default()),
        };
    }
}

/// Frame driver: current parameters plus frame timing.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub params: SceneParams,
    last_timestamp: Option<f64>,
    fps: f32,
}

impl Scene {
    pub fn new(params: SceneParams) -> Self {
        Self {
            params,
            last_timestamp: None,
            fps: 0.0,
        }
    }

    /// Record a frame at `timestamp_ms`, update the FPS estimate and
    /// advance the animation. Returns the elapsed milliseconds; the first
    /// frame only records its timestamp and returns 0.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_timestamp.replace(timestamp_ms) {
            Some(last) => (timestamp_ms - last) as f32,
            None => 0.0,
        };
        if dt > 0.0 {
            self.fps = 1000.0 / dt;
            self.params.advance(dt);
        }
        trace!(dt, fps = self.fps, angle_y = self.params.angle_y, "scene tick");
        dt
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_matrix(&self, aspect: f32) -> Result<Mat4> {
        self.params.frame_matrix(aspect)
    }
}

/// Parameters of the flat 2D demos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene2DParams {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Scene2DParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Scene2DParams {
    pub fn model_matrix(&self) -> Mat3 {
        Mat3::scaling(self.scale_x, self.scale_y)
            * Mat3::rotation(self.angle)
            * Mat3::translation(self.x, self.y)
    }

    /// Model followed by the pixel-to-clip projection of the canvas.
    pub fn frame_matrix(&self, width: f32, height: f32) -> Result<Mat3> {
        Ok(self.model_matrix() * Mat3::projection(width, height)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;

    fn still() -> SceneParams {
        SceneParams {
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            animate: false,
            ..SceneParams::default()
        }
    }

    #[test]
    fn test_rotate_accumulates() {
        let mut params = still();
        params.rotate(0.1, 0.2, 0.3);
        assert!((params.angle_x - 0.1).abs() < 1e-6);
        assert!((params.angle_y - 0.2).abs() < 1e-6);
        assert!((params.angle_z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        assert_eq!(still().rotation_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_model_matrix_composition_order() {
        let params = SceneParams {
            scale_x: 2.0,
            scale_y: 2.0,
            scale_z: 2.0,
            x: 1.0,
            z: 0.0,
            ..still()
        };
        // Scale applies before translation: (1,0,0) -> (2,0,0) -> (3,0,0).
        let p = params.model_matrix().transform_point([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(p, [3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rotation_orders_differ() {
        let xyz = SceneParams {
            angle_x: 0.5,
            angle_y: 1.0,
            angle_z: -0.7,
            ..still()
        };
        let zyx = SceneParams {
            rotation_order: RotationOrder::Zyx,
            ..xyz
        };
        let rx = Mat4::rotation_x(0.5);
        let ry = Mat4::rotation_y(1.0);
        let rz = Mat4::rotation_z(-0.7);
        assert_eq!(xyz.rotation_matrix(), rx * ry * rz);
        assert_eq!(zyx.rotation_matrix(), rz * ry * rx);
        assert_ne!(xyz.rotation_matrix(), zyx.rotation_matrix());
    }

    #[test]
    fn test_frame_matrix_without_camera() {
        let params = SceneParams::default();
        let expected = params.model_matrix() * params.projection_matrix(1.5).unwrap();
        assert_eq!(params.frame_matrix(1.5).unwrap(), expected);
    }

    #[test]
    fn test_frame_matrix_with_camera() {
        let params = SceneParams {
            camera: Some(OrbitCamera::new(0.3, 250.0)),
            ..SceneParams::default()
        };
        let view = params.view_matrix().unwrap();
        let expected = params.model_matrix() * view * params.projection_matrix(1.0).unwrap();
        assert_eq!(params.frame_matrix(1.0).unwrap(), expected);
    }

    #[test]
    fn test_default_frame_keeps_f_in_view() {
        let params = SceneParams::default();
        let m = params.frame_matrix(4.0 / 3.0).unwrap();
        for corner in [[0.0, 0.0, 0.0, 1.0], [100.0, 150.0, 30.0, 1.0]] {
            let clip = m.transform_point(corner);
            assert!(clip[3] > 0.0);
            for axis in 0..3 {
                assert!((clip[axis] / clip[3]).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_frame_matrix_rejects_inverted_clip_planes() {
        let mut params = SceneParams::default();
        params.lens.near = 500.0;
        params.lens.far = 100.0;
        assert!(matches!(
            params.frame_matrix(1.0),
            Err(Error::InvalidParameter { name: "far", .. })
        ));
    }

    #[test]
    fn test_advance_spins_and_wraps() {
        let mut params = SceneParams {
            angle_y: 1.0,
            ..SceneParams::default()
        };
        params.advance(100.0);
        assert_abs_diff_eq!(params.angle_y, 1.5, epsilon = 1e-6);

        params.angle_y = TAU + 0.01;
        params.advance(16.0);
        assert_eq!(params.angle_y, 0.0);

        params.animate = false;
        params.advance(1000.0);
        assert_eq!(params.angle_y, 0.0);
    }

    #[test]
    fn test_scene_tick_tracks_fps() {
        let mut scene = Scene::new(SceneParams {
            angle_y: 0.0,
            ..SceneParams::default()
        });
        assert_eq!(scene.tick(1000.0), 0.0);
        assert_eq!(scene.params.angle_y, 0.0);
        assert_eq!(scene.fps(), 0.0);

        let dt = scene.tick(1020.0);
        assert_eq!(dt, 20.0);
        assert_abs_diff_eq!(scene.params.angle_y, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(scene.fps(), 50.0, epsilon = 1e-4);

        // A repeated timestamp leaves the estimate alone.
        scene.tick(1020.0);
        assert_abs_diff_eq!(scene.fps(), 50.0, epsilon = 1e-4);
    }

    #[test]
    fn test_toggle_camera() {
        let mut params = SceneParams::default();
        params.toggle_camera();
        assert_eq!(params.camera, Some(OrbitCamera::default()));
        params.toggle_camera();
        assert!(params.camera.is_none());
    }

    #[test]
    fn test_scene_2d_frame() {
        let params = Scene2DParams {
            x: 200.0,
            y: 150.0,
            ..Scene2DParams::default()
        };
        let m = params.frame_matrix(400.0, 300.0).unwrap();
        let centre = m.transform_point([0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(centre[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(centre[1], 0.0, epsilon = 1e-6);

        assert!(params.frame_matrix(0.0, 300.0).is_err());
    }
}
