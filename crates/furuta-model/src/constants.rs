//! Inertia terms derived from the domain parameters.

use serde::{Deserialize, Serialize};

use crate::params::DomainParams;

/// Inertia terms that enter the mass matrix and the Coriolis terms.
///
/// Functions of the domain parameters only; recompute whenever those change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedConstants {
    /// Rotary arm inertia about its center, `Mr·Lr²/12`.
    pub j_r: f64,
    /// Pendulum inertia about its center, `Mp·Lp²/12`.
    pub j_p: f64,
    /// `Mp·Lp²/4`.
    pub j_p2: f64,
    /// Arm/pendulum coupling, `Mp·Lp·Lr/2`.
    pub j_pr: f64,
}

impl DerivedConstants {
    pub fn from_params(p: &DomainParams) -> Self {
        Self {
            j_r: p.mr * p.lr * p.lr / 12.0,
            j_p: p.mp * p.lp * p.lp / 12.0,
            j_p2: p.mp * p.lp * p.lp / 4.0,
            j_pr: p.mp * p.lp * p.lr / 2.0,
        }
    }

    /// Constant `(0,0)` part of the mass matrix, `J_r + Mp·Lr²`.
    pub fn arm_inertia(&self, p: &DomainParams) -> f64 {
        self.j_r + p.mp * p.lr * p.lr
    }

    /// `(1,1)` entry of the mass matrix, `J_p + Mp·Lp²/4`.
    pub fn pendulum_inertia(&self, p: &DomainParams) -> f64 {
        self.j_p + 0.25 * p.mp * p.lp * p.lp
    }
}
