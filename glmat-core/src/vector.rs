//! Vector helpers for camera construction
//!
//! These follow the demos' look-at arithmetic rather than nalgebra's
//! panicking/`Option` normalisation: a vector too short to normalise
//! collapses to zero.

use nalgebra::Vector3;

/// Vectors shorter than this normalise to zero.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// Unit vector in the direction of `v`, or the zero vector when
/// `|v| < NORMALIZE_EPSILON`.
pub fn normalize(v: &Vector3<f32>) -> Vector3<f32> {
    v.try_normalize(NORMALIZE_EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Right-handed cross product `a × b`.
pub fn cross(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    a.cross(b)
}

/// `a − b`
pub fn subtract(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    a - b
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize(&Vector3::new(3.0, 0.0, 4.0));
        assert_abs_diff_eq!(n.norm(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(n.x, 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(n.z, 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_degenerate_is_zero() {
        assert_eq!(normalize(&Vector3::zeros()), Vector3::zeros());
        assert_eq!(normalize(&Vector3::new(1e-6, 0.0, 0.0)), Vector3::zeros());
    }

    #[test]
    fn test_cross_is_right_handed() {
        let x = Vector3::x();
        let y = Vector3::y();
        assert_eq!(cross(&x, &y), Vector3::z());
        assert_eq!(cross(&y, &x), -Vector3::z());
    }
}
