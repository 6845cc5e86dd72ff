//! Equations of motion of the rotary pendulum.
//!
//! Generalized coordinates are the arm angle θ and the pendulum angle α
//! (α = 0 hanging down). The motor is modelled as a DC motor with armature
//! resistance `Rm` and back-EMF constant `km`, driven by voltage `u`:
//!
//! ```text
//! M(α) [θ̈ α̈]ᵀ = [τ_m − Dr·θ̇ − c_θ,  −Dp·α̇ − c_α]ᵀ
//! τ_m = km·(u − km·θ̇) / Rm
//! ```

use furuta_math::{Mat2, Real, StateVec, Vec2, solve2, state_from_array, state_to_array};
use furuta_model::{DerivedConstants, DomainParams, Model};

use crate::error::{DynamicsError, Result};

/// Mass matrix entries `[[m11, m12], [m12, m22]]` at pendulum angle `alpha`.
#[inline]
fn mass_entries<T: Real>(p: &DomainParams, c: &DerivedConstants, alpha: T) -> [[T; 2]; 2] {
    let (sa, ca) = (alpha.sin(), alpha.cos());
    let m11 = T::from_f64(c.arm_inertia(p)) + T::from_f64(c.j_p2) * sa * sa;
    let m12 = T::from_f64(c.j_pr) * ca;
    let m22 = T::from_f64(c.pendulum_inertia(p));
    [[m11, m12], [m12, m22]]
}

/// Time derivative `[θ̇, α̇, θ̈, α̈]` for any [`Real`] scalar.
///
/// The action is used as given; clipping is the caller's business.
pub fn derivative_with<T: Real>(
    p: &DomainParams,
    c: &DerivedConstants,
    x: [T; 4],
    u: T,
) -> Result<[T; 4]> {
    let [_theta, alpha, theta_dot, alpha_dot] = x;
    let f = T::from_f64;

    let sin_a = alpha.sin();
    let sin_2a = (alpha + alpha).sin();

    let tau = f(p.km) * (u - f(p.km) * theta_dot) / f(p.rm);

    let c_theta =
        f(c.j_p2) * sin_2a * theta_dot * alpha_dot - f(c.j_pr) * sin_a * alpha_dot * alpha_dot;
    let c_alpha =
        f(-0.5 * c.j_p2) * sin_2a * theta_dot * theta_dot + f(0.5 * p.mp * p.lp * p.g) * sin_a;

    let rhs = [
        tau - f(p.dr) * theta_dot - c_theta,
        -(f(p.dp) * alpha_dot) - c_alpha,
    ];

    let m = mass_entries(p, c, alpha);
    let [theta_ddot, alpha_ddot] = solve2(m, rhs).ok_or(DynamicsError::Degenerate {
        alpha: alpha.value(),
    })?;

    Ok([theta_dot, alpha_dot, theta_ddot, alpha_ddot])
}

/// Time derivative of the state at the model's current parameters.
pub fn derivative(model: &Model, x: &StateVec, u: f64) -> Result<StateVec> {
    let dx = derivative_with(model.params(), model.constants(), state_to_array(x), u)?;
    Ok(state_from_array(dx))
}

/// Generalized accelerations `[θ̈, α̈]`.
pub fn accelerations(model: &Model, x: &StateVec, u: f64) -> Result<Vec2> {
    let dx = derivative(model, x, u)?;
    Ok(Vec2::new(dx[2], dx[3]))
}

/// Configuration-dependent mass matrix `M(α)`.
pub fn mass_matrix(model: &Model, alpha: f64) -> Mat2 {
    let m = mass_entries(model.params(), model.constants(), alpha);
    Mat2::new(m[0][0], m[0][1], m[1][0], m[1][1])
}
