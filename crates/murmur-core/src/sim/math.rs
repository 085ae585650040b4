//! Vector helpers layered on `glam::Vec3`.
//!
//! `glam` already covers add, sub, scale, divide and distance. The two helpers
//! flocking needs on top are a zero-safe `set_mag` and the per-axis `limit`.

use glam::Vec3;

/// Unit vector in the direction of `v`, or the zero vector when `v` has no length.
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// `normalize(v) * n`. A zero vector stays zero.
#[inline]
pub fn set_mag(v: Vec3, n: f32) -> Vec3 {
    normalize(v) * n
}

/// Per-axis ceiling: every component above `n` becomes `n`.
///
/// This is not a magnitude clamp. Components below `-n` pass through untouched
/// and the vector is never rescaled proportionally.
#[inline]
pub fn limit(v: Vec3, n: f32) -> Vec3 {
    v.min(Vec3::splat(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_of_zero_is_zero() {
        assert_eq!(normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(set_mag(Vec3::ZERO, 3.0), Vec3::ZERO);
    }

    #[test]
    fn set_mag_rescales_to_requested_length() {
        let v = set_mag(Vec3::new(3.0, 4.0, 0.0), 10.0);
        assert!((v - Vec3::new(6.0, 8.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn limit_clamps_only_components_above_ceiling() {
        let v = limit(Vec3::new(0.5, 0.01, -0.5), 0.02);
        assert_eq!(v, Vec3::new(0.02, 0.01, -0.5));
    }

    #[test]
    fn limit_does_not_raise_large_negative_components() {
        let v = limit(Vec3::new(-3.0, -0.02, -100.0), 0.01);
        assert_eq!(v, Vec3::new(-3.0, -0.02, -100.0));
    }

    #[test]
    fn limit_is_not_proportional() {
        let v = limit(Vec3::new(4.0, 1.0, 0.0), 2.0);
        // direction changes: x is clipped, y keeps its value
        assert_eq!(v, Vec3::new(2.0, 1.0, 0.0));
    }
}
