//! Scalar types and small linear algebra for the furuta pendulum simulator.
//!
//! The state of the rotary pendulum lives in a fixed 4-vector
//! `[θ, α, θ̇, α̇]`; the equations of motion only ever need a 2×2 solve.
//! Everything that has to run on both plain floats and dual numbers is
//! written against the [`Real`] trait.

pub mod dual;
pub mod real;

pub use dual::Dual;
pub use real::Real;

use nalgebra as na;

/// 2D vector alias.
pub type Vec2 = na::Vector2<f64>;
/// 2x2 matrix alias.
pub type Mat2 = na::Matrix2<f64>;
/// Pendulum state `[θ, α, θ̇, α̇]`.
pub type StateVec = na::Vector4<f64>;
/// 4x4 matrix alias (state Jacobians).
pub type Mat4 = na::Matrix4<f64>;
/// Dynamic vector.
pub type DVec = na::DVector<f64>;
/// Dynamic matrix.
pub type DMat = na::DMatrix<f64>;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Relative determinant threshold below which a 2x2 system is treated as singular.
pub const SINGULAR_REL_TOL: f64 = 1e-10;

/// Wrap an angle into `[-π, π)`.
#[inline]
pub fn wrap_to_pi(angle: f64) -> f64 {
    use std::f64::consts::PI;
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Solve the 2x2 system `m * x = rhs` by Cramer's rule.
///
/// Returns `None` when the determinant is not finite or is negligible
/// relative to `|m00·m11| + m01·m10`.
#[inline]
pub fn solve2<T: Real>(m: [[T; 2]; 2], rhs: [T; 2]) -> Option<[T; 2]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    let scale = (m[0][0] * m[1][1]).value().abs() + (m[0][1] * m[1][0]).value().abs();
    let d = det.value();
    if !d.is_finite() || !(d.abs() > SINGULAR_REL_TOL * scale) {
        return None;
    }
    let x0 = (rhs[0] * m[1][1] - m[0][1] * rhs[1]) / det;
    let x1 = (m[0][0] * rhs[1] - m[1][0] * rhs[0]) / det;
    Some([x0, x1])
}

/// Convert a 4-array into a [`StateVec`].
#[inline]
pub fn state_from_array(x: [f64; 4]) -> StateVec {
    StateVec::new(x[0], x[1], x[2], x[3])
}

/// Convert a [`StateVec`] into a 4-array.
#[inline]
pub fn state_to_array(x: &StateVec) -> [f64; 4] {
    [x[0], x[1], x[2], x[3]]
}
