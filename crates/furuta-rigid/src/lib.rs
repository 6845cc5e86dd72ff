//! Rotary pendulum dynamics.
//!
//! Implements:
//! - Continuous-time equations of motion (2x2 mass-matrix solve)
//! - Mechanical energy and power bookkeeping
//! - Fixed-step explicit integrators (textbook RK4 and the frozen-acceleration variant)

pub mod dynamics;
pub mod energy;
pub mod error;
pub mod integrator;

pub use dynamics::{accelerations, derivative, derivative_with, mass_matrix};
pub use energy::{
    dissipated_power, input_power, kinetic_energy, motor_torque, potential_energy, total_energy,
};
pub use error::{DynamicsError, Result};
pub use integrator::{FrozenAccelerationRk4Solver, IntegratorKind, Rk4Solver, Solver};
