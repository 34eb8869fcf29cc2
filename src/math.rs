//! Small angle and heading helpers shared by the directors.
//!
//! Headings follow the left-handed, Y-up convention of the scene: a yaw of
//! `0` faces `+Z`, and increasing yaw turns towards `+X`.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate between two angles (radians) along the shortest arc.
///
/// `t` is clamped to `[0, 1]`. The result is not wrapped, so repeated calls
/// converge on `b` without jumping across the `±PI` seam.
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let mut delta = (b - a).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    a + delta * t.clamp(0.0, 1.0)
}

/// Unit forward vector (local `+Z`) for a yaw angle.
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Unit right vector (local `+X`) for a yaw angle.
#[inline]
pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Yaw that faces along the horizontal component of `dir`.
#[inline]
pub fn yaw_towards(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Drop the vertical component of a vector.
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn lerp_angle_takes_shortest_arc() {
        // From just below +PI to just above -PI is a short hop, not a full turn.
        let a = PI - 0.1;
        let b = -PI + 0.1;
        let mid = lerp_angle(a, b, 0.5);
        assert!(approx_eq(mid, PI));
    }

    #[test]
    fn lerp_angle_clamps_t() {
        assert!(approx_eq(lerp_angle(0.0, 1.0, 2.0), 1.0));
        assert!(approx_eq(lerp_angle(0.0, 1.0, -1.0), 0.0));
    }

    #[test]
    fn forward_and_right_are_orthogonal() {
        for yaw in [0.0_f32, 0.7, -2.1, 3.0] {
            let f = forward_from_yaw(yaw);
            let r = right_from_yaw(yaw);
            assert!(approx_eq(f.dot(r), 0.0));
            assert!(approx_eq(f.length(), 1.0));
        }
    }

    #[test]
    fn yaw_towards_inverts_forward() {
        let yaw = 1.2;
        assert!(approx_eq(yaw_towards(forward_from_yaw(yaw)), yaw));
    }
}
