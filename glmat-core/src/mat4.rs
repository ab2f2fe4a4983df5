//! 4x4 transforms for 3D scenes
//!
//! Storage is row-major and points are row vectors multiplied on the left
//! (`p' = p × M`), so translation occupies the last row. The flat array is
//! uploaded as-is with `transpose = false`.

use std::f32::consts::PI;
use std::ops::{Index, Mul};

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Matrix4, Vector3};

use crate::error::{Error, Result};
use crate::vector::{cross, normalize, subtract};

/// Row-major 4x4 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    m: [f32; 16],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const fn from_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub const fn to_array(self) -> [f32; 16] {
        self.m
    }

    /// Flat row-major view, ready for `uniformMatrix4fv(.., false, ..)`.
    pub fn as_slice(&self) -> &[f32] {
        &self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 4 + col]
    }

    pub fn row(&self, row: usize) -> [f32; 4] {
        let r = row * 4;
        [self.m[r], self.m[r + 1], self.m[r + 2], self.m[r + 3]]
    }

    /// Translation row of the matrix (where `look_at` stores the camera).
    pub fn translation_part(&self) -> Vector3<f32> {
        Vector3::new(self.m[12], self.m[13], self.m[14])
    }

    pub fn translation(tx: f32, ty: f32, tz: f32) -> Self {
        Self::from_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            tx, ty, tz, 1.0,
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_array([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_array([
            c, 0.0, -s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_array([
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Non-uniform scale. Zero and negative factors are allowed.
    pub fn scaling(sx: f32, sy: f32, sz: f32) -> Self {
        Self::from_array([
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed perspective projection.
    ///
    /// View-space z in `[-near, -far]` maps to clip z/w in `[-1, 1]`; the
    /// `-1` in the third row feeds `-z` into w for the perspective divide.
    ///
    /// Requires `0 < fov < π`, `aspect > 0` and `0 < near < far`.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        if !(fov > 0.0 && fov < PI) {
            return Err(Error::invalid("fov", fov, "must lie strictly between 0 and π"));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(Error::invalid("aspect", aspect, "must be positive and finite"));
        }
        if !(near > 0.0 && near.is_finite()) {
            return Err(Error::invalid("near", near, "must be positive and finite"));
        }
        if !(far > near && far.is_finite()) {
            return Err(Error::invalid("far", far, "must be finite and greater than near"));
        }

        let f = (PI * 0.5 - 0.5 * fov).tan();
        let range_inv = 1.0 / (near - far);

        Ok(Self::from_array([
            f / aspect, 0.0, 0.0, 0.0, //
            0.0, f, 0.0, 0.0, //
            0.0, 0.0, (near + far) * range_inv, -1.0, //
            0.0, 0.0, near * far * range_inv * 2.0, 0.0,
        ]))
    }

    /// Box projection of `[left, right] × [bottom, top] × [near, far]`
    /// onto the clip cube.
    pub fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        let extents = [
            ("right", right, right - left),
            ("top", top, top - bottom),
            ("far", far, far - near),
        ];
        for (name, value, extent) in extents {
            if extent == 0.0 || !extent.is_finite() {
                return Err(Error::invalid(name, value, "range must be finite and non-empty"));
            }
        }

        Ok(Self::from_array([
            2.0 / (right - left), 0.0, 0.0, 0.0, //
            0.0, 2.0 / (top - bottom), 0.0, 0.0, //
            0.0, 0.0, 2.0 / (near - far), 0.0, //
            (left + right) / (left - right),
            (bottom + top) / (bottom - top),
            (near + far) / (near - far),
            1.0,
        ]))
    }

    /// Camera-to-world matrix for a camera at `camera` facing `target`.
    ///
    /// Rows hold the camera's x, y and z axes followed by its position.
    /// If `camera == target` or `up` is parallel to the view direction the
    /// affected axes come out as zero vectors; nothing is reported.
    pub fn look_at(camera: &Vector3<f32>, target: &Vector3<f32>, up: &Vector3<f32>) -> Self {
        let z = normalize(&subtract(camera, target));
        let x = normalize(&cross(up, &z));
        let y = normalize(&cross(&z, &x));

        Self::from_array([
            x.x, x.y, x.z, 0.0, //
            y.x, y.y, y.z, 0.0, //
            z.x, z.y, z.z, 0.0, //
            camera.x, camera.y, camera.z, 1.0,
        ])
    }

    /// Row-major product `self × other`. With row vectors, `self` is
    /// applied first.
    pub fn multiply(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = a[row * 4] * b[col]
                    + a[row * 4 + 1] * b[4 + col]
                    + a[row * 4 + 2] * b[8 + col]
                    + a[row * 4 + 3] * b[12 + col];
            }
        }
        Self::from_array(out)
    }

    /// `point × self` for a homogeneous row vector. No divide by w.
    pub fn transform_point(&self, point: [f32; 4]) -> [f32; 4] {
        let m = &self.m;
        let mut out = [0.0; 4];
        for (col, value) in out.iter_mut().enumerate() {
            *value = point[0] * m[col]
                + point[1] * m[4 + col]
                + point[2] * m[8 + col]
                + point[3] * m[12 + col];
        }
        out
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_array([
            m[0], m[4], m[8], m[12], //
            m[1], m[5], m[9], m[13], //
            m[2], m[6], m[10], m[14], //
            m[3], m[7], m[11], m[15],
        ])
    }

    pub fn determinant(&self) -> f32 {
        Minors::of(self).determinant()
    }

    /// Inverse via the adjugate. A singular matrix divides by zero and
    /// yields non-finite entries; use [`Mat4::try_invert`] to detect that.
    pub fn invert(&self) -> Self {
        let minors = Minors::of(self);
        minors.adjugate_scaled(self, 1.0 / minors.determinant())
    }

    /// Like [`Mat4::invert`] but fails when `|det| < epsilon`.
    pub fn try_invert(&self, epsilon: f32) -> Result<Self> {
        let minors = Minors::of(self);
        let determinant = minors.determinant();
        if !(determinant.abs() >= epsilon) {
            return Err(Error::SingularMatrix {
                determinant,
                epsilon,
            });
        }
        Ok(minors.adjugate_scaled(self, 1.0 / determinant))
    }
}

/// 2x2 minors of the top and bottom row pairs, shared by the determinant
/// and the adjugate.
struct Minors {
    top: [f32; 6],
    bottom: [f32; 6],
}

impl Minors {
    fn of(m: &Mat4) -> Self {
        let a = &m.m;
        let pair = |r: usize, i: usize, j: usize| a[r + i] * a[r + 4 + j] - a[r + j] * a[r + 4 + i];
        Self {
            top: [
                pair(0, 0, 1),
                pair(0, 0, 2),
                pair(0, 0, 3),
                pair(0, 1, 2),
                pair(0, 1, 3),
                pair(0, 2, 3),
            ],
            bottom: [
                pair(8, 0, 1),
                pair(8, 0, 2),
                pair(8, 0, 3),
                pair(8, 1, 2),
                pair(8, 1, 3),
                pair(8, 2, 3),
            ],
        }
    }

    fn determinant(&self) -> f32 {
        let [b00, b01, b02, b03, b04, b05] = self.top;
        let [b06, b07, b08, b09, b10, b11] = self.bottom;
        b00 * b11 - b01 * b10 + b02 * b09 + b03 * b08 - b04 * b07 + b05 * b06
    }

    fn adjugate_scaled(&self, m: &Mat4, inv_det: f32) -> Mat4 {
        let [a00, a01, a02, a03, a10, a11, a12, a13, a20, a21, a22, a23, a30, a31, a32, a33] = m.m;
        let [b00, b01, b02, b03, b04, b05] = self.top;
        let [b06, b07, b08, b09, b10, b11] = self.bottom;

        let adj = [
            a11 * b11 - a12 * b10 + a13 * b09,
            a02 * b10 - a01 * b11 - a03 * b09,
            a31 * b05 - a32 * b04 + a33 * b03,
            a22 * b04 - a21 * b05 - a23 * b03,
            a12 * b08 - a10 * b11 - a13 * b07,
            a00 * b11 - a02 * b08 + a03 * b07,
            a32 * b02 - a30 * b05 - a33 * b01,
            a20 * b05 - a22 * b02 + a23 * b01,
            a10 * b10 - a11 * b08 + a13 * b06,
            a01 * b08 - a00 * b10 - a03 * b06,
            a30 * b04 - a31 * b02 + a33 * b00,
            a21 * b02 - a20 * b04 - a23 * b00,
            a11 * b07 - a10 * b09 - a12 * b06,
            a00 * b09 - a01 * b07 + a02 * b06,
            a31 * b01 - a30 * b03 - a32 * b00,
            a20 * b03 - a21 * b01 + a22 * b00,
        ];
        Mat4::from_array(adj.map(|v| v * inv_det))
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        self.multiply(&rhs)
    }
}

impl Index<usize> for Mat4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.m[index]
    }
}

impl From<[f32; 16]> for Mat4 {
    fn from(m: [f32; 16]) -> Self {
        Self::from_array(m)
    }
}

impl From<Mat4> for [f32; 16] {
    fn from(m: Mat4) -> Self {
        m.m
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(m: Mat4) -> Self {
        Matrix4::from_row_slice(&m.m)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(m: Matrix4<f32>) -> Self {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = m[(row, col)];
            }
        }
        Self::from_array(out)
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
