//! Energy and power of the rotary pendulum.

use furuta_math::{StateVec, Vec2};
use furuta_model::Model;

use crate::dynamics::mass_matrix;

/// Kinetic energy: `0.5 * q̇ᵀ M(α) q̇`.
pub fn kinetic_energy(model: &Model, x: &StateVec) -> f64 {
    let qd = Vec2::new(x[2], x[3]);
    0.5 * qd.dot(&(mass_matrix(model, x[1]) * qd))
}

/// Gravitational potential energy of the pendulum, zero at the pivot height.
///
/// PE = -0.5 * Mp * Lp * g * cos(α)
pub fn potential_energy(model: &Model, x: &StateVec) -> f64 {
    let p = model.params();
    -0.5 * p.mp * p.lp * p.g * x[1].cos()
}

/// Total mechanical energy (kinetic + potential).
pub fn total_energy(model: &Model, x: &StateVec) -> f64 {
    kinetic_energy(model, x) + potential_energy(model, x)
}

/// Motor torque on the arm for voltage `u`, including back-EMF.
pub fn motor_torque(model: &Model, x: &StateVec, u: f64) -> f64 {
    let p = model.params();
    p.km * (u - p.km * x[2]) / p.rm
}

/// Mechanical power delivered by the motor, `τ_m·θ̇`.
pub fn input_power(model: &Model, x: &StateVec, u: f64) -> f64 {
    motor_torque(model, x, u) * x[2]
}

/// Power lost to viscous joint damping, `Dr·θ̇² + Dp·α̇²`.
pub fn dissipated_power(model: &Model, x: &StateVec) -> f64 {
    let p = model.params();
    p.dr * x[2] * x[2] + p.dp * x[3] * x[3]
}
