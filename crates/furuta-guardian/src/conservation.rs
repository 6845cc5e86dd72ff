//! Conservation law monitoring for the rotary pendulum.
//!
//! With zero damping, zero motor coupling (`km = 0`) and zero voltage the
//! system is conservative and θ is cyclic, so both the mechanical energy and
//! the vertical angular momentum `p_θ = M11·θ̇ + M12·α̇` are invariants.

use furuta_math::StateVec;
use furuta_model::Model;
use furuta_rigid::{mass_matrix, total_energy};

/// Generalized momentum conjugate to the arm angle (vertical angular momentum).
pub fn arm_momentum(model: &Model, x: &StateVec) -> f64 {
    let m = mass_matrix(model, x[1]);
    m[(0, 0)] * x[2] + m[(0, 1)] * x[3]
}

/// Baseline conservation quantities to track drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationState {
    pub baseline_energy: f64,
    pub baseline_arm_momentum: f64,
}

impl ConservationState {
    pub fn new(model: &Model, x: &StateVec) -> Self {
        Self {
            baseline_energy: total_energy(model, x),
            baseline_arm_momentum: arm_momentum(model, x),
        }
    }
}

/// Conservation errors at the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConservationMonitor {
    /// Relative energy error `|E - E₀| / |E₀|`, absolute when `E₀ ≈ 0`.
    pub energy_error: f64,
    /// Absolute momentum error `|p_θ - p_θ₀|`.
    pub arm_momentum_error: f64,
}

impl ConservationMonitor {
    pub fn check(baseline: &ConservationState, model: &Model, x: &StateVec) -> Self {
        let energy = total_energy(model, x);
        let energy_error = if baseline.baseline_energy.abs() > 1e-12 {
            (energy - baseline.baseline_energy).abs() / baseline.baseline_energy.abs()
        } else {
            (energy - baseline.baseline_energy).abs()
        };

        Self {
            energy_error,
            arm_momentum_error: (arm_momentum(model, x) - baseline.baseline_arm_momentum).abs(),
        }
    }

    pub fn is_violated(&self, energy_tol: f64, momentum_tol: f64) -> bool {
        self.energy_error > energy_tol || self.arm_momentum_error > momentum_tol
    }

    /// Largest error, the momentum term squashed into `[0, 1)`.
    pub fn max_relative_error(&self) -> f64 {
        let mom_rel = self.arm_momentum_error / (1.0 + self.arm_momentum_error);
        self.energy_error.max(mom_rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furuta_model::{DomainParam, ModelBuilder};
    use furuta_rigid::{IntegratorKind, Rk4Solver, Solver};

    fn conservative() -> Model {
        ModelBuilder::new()
            .param(DomainParam::Dr, 0.0)
            .param(DomainParam::Dp, 0.0)
            .param(DomainParam::Km, 0.0)
            .dt(1e-3)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rk4_conserves_energy_and_momentum() {
        let model = conservative();
        let mut x = StateVec::new(0.0, 1.0, 2.0, 0.0);
        let baseline = ConservationState::new(&model, &x);

        for _ in 0..2000 {
            x = Rk4Solver.integrate(&model, &x, 0.0, model.dt()).unwrap();
        }

        let monitor = ConservationMonitor::check(&baseline, &model, &x);
        assert!(monitor.energy_error < 1e-4, "energy error {}", monitor.energy_error);
        assert!(
            monitor.arm_momentum_error < 1e-7,
            "momentum error {}",
            monitor.arm_momentum_error
        );
        assert!(!monitor.is_violated(1e-4, 1e-7));
    }

    #[test]
    fn test_frozen_scheme_drifts_more() {
        let model = conservative();
        let x0 = StateVec::new(0.0, 1.0, 2.0, 0.0);
        let baseline = ConservationState::new(&model, &x0);

        let drift = |kind: IntegratorKind| {
            let mut x = x0;
            for _ in 0..2000 {
                x = kind.integrate(&model, &x, 0.0, model.dt()).unwrap();
            }
            ConservationMonitor::check(&baseline, &model, &x).energy_error
        };

        let rk4 = drift(IntegratorKind::Rk4);
        let frozen = drift(IntegratorKind::FrozenAccelerationRk4);
        assert!(frozen > 10.0 * rk4, "frozen {frozen} vs rk4 {rk4}");
    }

    #[test]
    fn test_back_emf_dissipates() {
        let model = ModelBuilder::new()
            .param(DomainParam::Dr, 0.0)
            .param(DomainParam::Dp, 0.0)
            .dt(1e-3)
            .build()
            .unwrap();
        let mut x = StateVec::new(0.0, 1.0, 2.0, 0.0);
        let e0 = total_energy(&model, &x);
        for _ in 0..2000 {
            x = Rk4Solver.integrate(&model, &x, 0.0, model.dt()).unwrap();
        }
        assert!(total_energy(&model, &x) < e0);
    }
}
