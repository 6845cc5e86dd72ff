//! Fixed-step explicit integrators.
//!
//! The action is held constant over the whole step (zero-order hold).

use furuta_math::{StateVec, state_to_array};
use furuta_model::Model;
use serde::{Deserialize, Serialize};

use crate::dynamics::derivative;
use crate::error::{DynamicsError, Result};

/// Pluggable integration scheme.
///
/// Implementations advance a state by `h` seconds. They must be pure in
/// `(model, x, u, h)` so outer loops can call them from many threads.
pub trait Solver: Send + Sync {
    /// Integrate `x` over one step of length `h` under constant action `u`.
    fn integrate(&self, model: &Model, x: &StateVec, u: f64, h: f64) -> Result<StateVec>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

fn check_finite(x: StateVec) -> Result<StateVec> {
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(DynamicsError::NonFinite {
            state: state_to_array(&x),
        })
    }
}

/// Classical 4th-order Runge-Kutta.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rk4Solver;

impl Solver for Rk4Solver {
    fn integrate(&self, model: &Model, x: &StateVec, u: f64, h: f64) -> Result<StateVec> {
        let k1 = derivative(model, x, u)?;
        let k2 = derivative(model, &(x + k1 * (h / 2.0)), u)?;
        let k3 = derivative(model, &(x + k2 * (h / 2.0)), u)?;
        let k4 = derivative(model, &(x + k3 * h), u)?;

        check_finite(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}

/// Runge-Kutta stages with the accelerations frozen at the start of the step.
///
/// Only the velocity components of each stage state feed the position rates,
/// which makes one step equal to
/// `q' = q + h·q̇ + h²/2·q̈`, `q̇' = q̇ + h·q̈`.
/// First order globally. Kept to reproduce recorded reference trajectories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrozenAccelerationRk4Solver;

impl Solver for FrozenAccelerationRk4Solver {
    fn integrate(&self, model: &Model, x: &StateVec, u: f64, h: f64) -> Result<StateVec> {
        let dx = derivative(model, x, u)?;
        let (tdd, add) = (dx[2], dx[3]);
        let stage = |s: &StateVec| StateVec::new(s[2], s[3], tdd, add);

        let k1 = stage(x);
        let k2 = stage(&(x + k1 * (h / 2.0)));
        let k3 = stage(&(x + k2 * (h / 2.0)));
        let k4 = stage(&(x + k3 * h));

        check_finite(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0))
    }

    fn name(&self) -> &'static str {
        "frozen_acceleration_rk4"
    }
}

/// Integrator selection for configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    #[default]
    Rk4,
    FrozenAccelerationRk4,
}

impl IntegratorKind {
    pub fn solver(self) -> Box<dyn Solver> {
        match self {
            IntegratorKind::Rk4 => Box::new(Rk4Solver),
            IntegratorKind::FrozenAccelerationRk4 => Box::new(FrozenAccelerationRk4Solver),
        }
    }

    /// Integrate without boxing.
    pub fn integrate(self, model: &Model, x: &StateVec, u: f64, h: f64) -> Result<StateVec> {
        match self {
            IntegratorKind::Rk4 => Rk4Solver.integrate(model, x, u, h),
            IntegratorKind::FrozenAccelerationRk4 => {
                FrozenAccelerationRk4Solver.integrate(model, x, u, h)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::derivative;
    use approx::assert_relative_eq;

    fn run(kind: IntegratorKind, model: &Model, x0: StateVec, h: f64, t: f64) -> StateVec {
        let n = (t / h).round() as usize;
        let mut x = x0;
        for _ in 0..n {
            x = kind.integrate(model, &x, 0.0, h).unwrap();
        }
        x
    }

    #[test]
    fn test_fixed_point_stays_put() {
        let model = Model::nominal(0.004).unwrap();
        for kind in [IntegratorKind::Rk4, IntegratorKind::FrozenAccelerationRk4] {
            let x = kind.integrate(&model, &StateVec::zeros(), 0.0, 0.004).unwrap();
            assert_eq!(x, StateVec::zeros());
        }
    }

    #[test]
    fn test_frozen_step_closed_form() {
        let model = Model::nominal(0.004).unwrap();
        let x = StateVec::new(0.1, 0.8, -0.4, 1.3);
        let u = 1.0;
        let h = 0.004;
        let dx = derivative(&model, &x, u).unwrap();
        let next = FrozenAccelerationRk4Solver.integrate(&model, &x, u, h).unwrap();

        assert_relative_eq!(next[0], x[0] + h * x[2] + 0.5 * h * h * dx[2], epsilon = 1e-14);
        assert_relative_eq!(next[1], x[1] + h * x[3] + 0.5 * h * h * dx[3], epsilon = 1e-14);
        assert_relative_eq!(next[2], x[2] + h * dx[2], epsilon = 1e-13);
        assert_relative_eq!(next[3], x[3] + h * dx[3], epsilon = 1e-13);
    }

    #[test]
    fn test_rk4_is_fourth_order() {
        let model = Model::nominal(0.004).unwrap();
        let x0 = StateVec::new(0.0, 0.5, 0.0, 0.0);
        let t = 0.2;
        let a = run(IntegratorKind::Rk4, &model, x0, 0.01, t);
        let b = run(IntegratorKind::Rk4, &model, x0, 0.005, t);
        let c = run(IntegratorKind::Rk4, &model, x0, 0.0025, t);
        let ratio = (a - b).norm() / (b - c).norm();
        assert!(ratio > 10.0 && ratio < 22.0, "ratio = {ratio}");
    }

    #[test]
    fn test_frozen_is_first_order() {
        let model = Model::nominal(0.004).unwrap();
        let x0 = StateVec::new(0.0, 0.5, 0.0, 0.0);
        let t = 0.2;
        let kind = IntegratorKind::FrozenAccelerationRk4;
        let a = run(kind, &model, x0, 0.01, t);
        let b = run(kind, &model, x0, 0.005, t);
        let c = run(kind, &model, x0, 0.0025, t);
        let ratio = (a - b).norm() / (b - c).norm();
        assert!(ratio > 1.5 && ratio < 2.6, "ratio = {ratio}");
    }

    #[test]
    fn test_nan_state_is_rejected() {
        let model = Model::nominal(0.004).unwrap();
        let x = StateVec::new(0.0, f64::NAN, 0.0, 0.0);
        assert!(matches!(
            Rk4Solver.integrate(&model, &x, 0.0, 0.004),
            Err(DynamicsError::Degenerate { .. })
        ));
        let x = StateVec::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(matches!(
            FrozenAccelerationRk4Solver.integrate(&model, &x, 0.0, 0.004),
            Err(DynamicsError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&IntegratorKind::FrozenAccelerationRk4).unwrap();
        assert_eq!(json, "\"frozen_acceleration_rk4\"");
        let kind: IntegratorKind = serde_json::from_str("\"rk4\"").unwrap();
        assert_eq!(kind, IntegratorKind::Rk4);
        assert_eq!(IntegratorKind::default().solver().name(), "rk4");
    }
}
