//! Simulation state: mutable per-step data.

use furuta_math::{StateVec, state_from_array};
use serde::{Deserialize, Serialize};

/// Mutable simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// `[θ, α, θ̇, α̇]` in rad and rad/s. `α = 0` hangs down, `α = ±π` is upright.
    pub x: StateVec,
    /// Last applied (clipped) motor voltage.
    pub ctrl: f64,
    /// Simulation time.
    pub time: f64,
}

impl Default for State {
    fn default() -> Self {
        Self::new(StateVec::zeros())
    }
}

impl State {
    pub fn new(x: StateVec) -> Self {
        Self {
            x,
            ctrl: 0.0,
            time: 0.0,
        }
    }

    pub fn from_array(x: [f64; 4]) -> Self {
        Self::new(state_from_array(x))
    }

    #[inline]
    pub fn theta(&self) -> f64 {
        self.x[0]
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.x[1]
    }

    #[inline]
    pub fn theta_dot(&self) -> f64 {
        self.x[2]
    }

    #[inline]
    pub fn alpha_dot(&self) -> f64 {
        self.x[3]
    }

    pub fn is_finite(&self) -> bool {
        self.x.iter().all(|v| v.is_finite())
    }
}
