//! Energy bookkeeping with actuation and damping.
//!
//! Along any trajectory `dE/dt = τ_m·θ̇ − Dr·θ̇² − Dp·α̇²`. The ledger
//! integrates the right-hand side with the trapezoid rule so the residual
//! `ΔE − (W_in − W_loss)` measures integration error even when energy is
//! not conserved.

use furuta_math::StateVec;
use furuta_model::Model;
use furuta_rigid::{dissipated_power, input_power, total_energy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBalance {
    initial_energy: f64,
    current_energy: f64,
    input_work: f64,
    dissipated_work: f64,
}

impl PowerBalance {
    pub fn new(model: &Model, x0: &StateVec) -> Self {
        let e = total_energy(model, x0);
        Self {
            initial_energy: e,
            current_energy: e,
            input_work: 0.0,
            dissipated_work: 0.0,
        }
    }

    /// Account for one step `x_prev -> x_next` of length `dt` under constant `u`.
    pub fn record(
        &mut self,
        model: &Model,
        x_prev: &StateVec,
        u: f64,
        x_next: &StateVec,
        dt: f64,
    ) {
        self.input_work +=
            0.5 * dt * (input_power(model, x_prev, u) + input_power(model, x_next, u));
        self.dissipated_work +=
            0.5 * dt * (dissipated_power(model, x_prev) + dissipated_power(model, x_next));
        self.current_energy = total_energy(model, x_next);
    }

    /// Work done by the motor on the mechanism so far.
    pub fn input_work(&self) -> f64 {
        self.input_work
    }

    /// Energy lost to viscous damping so far.
    pub fn dissipated_work(&self) -> f64 {
        self.dissipated_work
    }

    pub fn energy_change(&self) -> f64 {
        self.current_energy - self.initial_energy
    }

    /// `ΔE − (W_in − W_loss)`; zero for exact integration.
    pub fn residual(&self) -> f64 {
        self.energy_change() - (self.input_work - self.dissipated_work)
    }

    /// Residual relative to the total work exchanged.
    pub fn relative_residual(&self) -> f64 {
        let scale = self.input_work.abs() + self.dissipated_work.abs();
        if scale > 1e-15 {
            self.residual().abs() / scale
        } else {
            self.residual().abs()
        }
    }
}
