//! 3x3 transforms for 2D scenes
//!
//! Same conventions as [`crate::Mat4`]: row-major storage, row vectors
//! `(x, y, 1)` multiplied on the left, translation in the last row.

use std::ops::{Index, Mul};

use approx::{AbsDiffEq, RelativeEq};

use crate::error::{Error, Result};

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    m: [f32; 9],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ],
    };

    pub const fn from_array(m: [f32; 9]) -> Self {
        Self { m }
    }

    pub const fn to_array(self) -> [f32; 9] {
        self.m
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row * 3 + col]
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::from_array([
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            tx, ty, 1.0,
        ])
    }

    /// Rotation in the plane, i.e. about the z axis.
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_array([
            c, s, 0.0, //
            -s, c, 0.0, //
            0.0, 0.0, 1.0,
        ])
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self::from_array([
            sx, 0.0, 0.0, //
            0.0, sy, 0.0, //
            0.0, 0.0, 1.0,
        ])
    }

    /// Maps pixel coordinates (origin top-left, +y down) of a
    /// `width × height` canvas onto clip space.
    pub fn projection(width: f32, height: f32) -> Result<Self> {
        if !(width > 0.0 && width.is_finite()) {
            return Err(Error::invalid("width", width, "must be positive and finite"));
        }
        if !(height > 0.0 && height.is_finite()) {
            return Err(Error::invalid("height", height, "must be positive and finite"));
        }

        Ok(Self::from_array([
            2.0 / width, 0.0, 0.0, //
            0.0, -2.0 / height, 0.0, //
            -1.0, 1.0, 1.0,
        ]))
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let a = &self.m;
        let b = &other.m;
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] =
                    a[row * 3] * b[col] + a[row * 3 + 1] * b[3 + col] + a[row * 3 + 2] * b[6 + col];
            }
        }
        Self::from_array(out)
    }

    /// `point × self` for a homogeneous 2D row vector.
    pub fn transform_point(&self, point: [f32; 3]) -> [f32; 3] {
        let m = &self.m;
        [
            point[0] * m[0] + point[1] * m[3] + point[2] * m[6],
            point[0] * m[1] + point[1] * m[4] + point[2] * m[7],
            point[0] * m[2] + point[1] * m[5] + point[2] * m[8],
        ]
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        Self::from_array([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    /// Inverse via the adjugate; singular input yields non-finite entries.
    pub fn invert(&self) -> Self {
        let m = &self.m;
        let inv_det = 1.0 / self.determinant();
        let adj = [
            m[4] * m[8] - m[5] * m[7],
            m[2] * m[7] - m[1] * m[8],
            m[1] * m[5] - m[2] * m[4],
            m[5] * m[6] - m[3] * m[8],
            m[0] * m[8] - m[2] * m[6],
            m[2] * m[3] - m[0] * m[5],
            m[3] * m[7] - m[4] * m[6],
            m[1] * m[6] - m[0] * m[7],
            m[0] * m[4] - m[1] * m[3],
        ];
        Self::from_array(adj.map(|v| v * inv_det))
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        self.multiply(&rhs)
    }
}

impl Index<usize> for Mat3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.m[index]
    }
}

impl From<[f32; 9]> for Mat3 {
    fn from(m: [f32; 9]) -> Self {
        Self::from_array(m)
    }
}

impl From<Mat3> for [f32; 9] {
    fn from(m: Mat3) -> Self {
        m.m
    }
}

impl AbsDiffEq for Mat3 {
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

impl RelativeEq for Mat3 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_transforms() {
        assert_eq!(Mat3::rotation(0.0), Mat3::IDENTITY);
        assert_eq!(Mat3::translation(0.0, 0.0), Mat3::IDENTITY);
        assert_eq!(Mat3::scaling(1.0, 1.0), Mat3::IDENTITY);
    }

    #[test]
    fn test_rotation_layout() {
        let (s, c) = 0.5f32.sin_cos();
        let r = Mat3::rotation(0.5);
        assert_eq!(r.to_array(), [c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_maps_canvas_corners() {
        let p = Mat3::projection(400.0, 300.0).unwrap();
        assert_eq!(p.transform_point([0.0, 0.0, 1.0]), [-1.0, 1.0, 1.0]);

        let corner = p.transform_point([400.0, 300.0, 1.0]);
        assert_abs_diff_eq!(corner[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(corner[1], -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_projection_rejects_empty_canvas() {
        assert!(matches!(
            Mat3::projection(0.0, 300.0),
            Err(Error::InvalidParameter { name: "width", .. })
        ));
        assert!(matches!(
            Mat3::projection(400.0, -1.0),
            Err(Error::InvalidParameter { name: "height", .. })
        ));
    }

    #[test]
    fn test_translate_then_rotate() {
        let m = Mat3::translation(10.0, 0.0) * Mat3::rotation(std::f32::consts::FRAC_PI_2);
        let p = m.transform_point([0.0, 0.0, 1.0]);
        // (10, 0) rotated a quarter turn with the [c, s; -s, c] convention.
        assert_abs_diff_eq!(p[0], 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(p[1], 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat3::scaling(2.0, -0.5) * Mat3::rotation(1.1) * Mat3::translation(30.0, 12.0);
        assert_abs_diff_eq!(m * m.invert(), Mat3::IDENTITY, epsilon = 1e-4);
    }

    #[test]
    fn test_transpose() {
        let m = Mat3::translation(3.0, 4.0).transpose();
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(1, 2), 4.0);
    }
}
