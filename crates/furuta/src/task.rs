//! Task variants, their spaces and the desired-state reward.

use std::f64::consts::PI;

use furuta_math::{DVec, Mat4, StateVec, wrap_to_pi};
use furuta_model::MAX_ACT_VOLTAGE;
use serde::{Deserialize, Serialize};

use crate::error::{FurutaError, Result};
use crate::observation::ObservationProjector;
use crate::space::BoxSpace;

const STATE_LABELS: [&str; 4] = ["theta", "alpha", "theta_dot", "alpha_dot"];

/// Which control problem the environment poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskVariant {
    /// Swing the pendulum up from hanging and balance it.
    #[default]
    SwingUp,
    /// Balance from near upright. Mostly for testing and tuning stabilizers.
    Stabilize,
}

/// The four spaces of an environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Spaces {
    pub state: BoxSpace,
    pub obs: BoxSpace,
    pub act: BoxSpace,
    pub init: BoxSpace,
}

impl TaskVariant {
    pub fn projector(self) -> ObservationProjector {
        match self {
            Self::SwingUp => ObservationProjector::Trig,
            Self::Stabilize => ObservationProjector::Identity,
        }
    }

    pub fn state_space(self) -> Result<BoxSpace> {
        let max_theta = match self {
            Self::SwingUp => 115.0_f64,
            Self::Stabilize => 120.0,
        }
        .to_radians();
        BoxSpace::symmetric(
            DVec::from_vec(vec![max_theta, 4.0 * PI, 20.0 * PI, 20.0 * PI]),
            STATE_LABELS,
        )
    }

    pub fn init_space(self) -> Result<BoxSpace> {
        match self {
            Self::SwingUp => BoxSpace::symmetric(
                DVec::from_vec(vec![2.0, 1.0, 0.5, 0.5]).map(f64::to_radians),
                STATE_LABELS,
            ),
            Self::Stabilize => BoxSpace::new(
                DVec::from_vec(vec![-5.0, 175.0, 0.0, 0.0]).map(f64::to_radians),
                DVec::from_vec(vec![5.0, 185.0, 0.0, 0.0]).map(f64::to_radians),
                STATE_LABELS,
            ),
        }
    }

    pub fn obs_space(self) -> Result<BoxSpace> {
        match self {
            Self::SwingUp => BoxSpace::symmetric(
                DVec::from_vec(vec![1.0, 1.0, 1.0, 1.0, f64::INFINITY, f64::INFINITY]),
                ObservationProjector::Trig.labels().iter().copied(),
            ),
            Self::Stabilize => self.state_space(),
        }
    }

    pub fn act_space(self) -> Result<BoxSpace> {
        BoxSpace::symmetric(DVec::from_element(1, MAX_ACT_VOLTAGE), ["V"])
    }

    pub fn spaces(self) -> Result<Spaces> {
        Ok(Spaces {
            state: self.state_space()?,
            obs: self.obs_space()?,
            act: self.act_space()?,
            init: self.init_space()?,
        })
    }

    /// Diagonal of the default state-error weight.
    pub fn default_q(self) -> StateVec {
        match self {
            Self::SwingUp => StateVec::new(0.3, 1.0, 2e-2, 5e-3),
            Self::Stabilize => StateVec::new(3.0, 4.0, 2.0, 2.0),
        }
    }

    pub fn default_r(self) -> f64 {
        match self {
            Self::SwingUp => 4e-3,
            Self::Stabilize => 5e-2,
        }
    }
}

/// Upright, arm centered.
pub fn upright() -> StateVec {
    StateVec::new(0.0, PI, 0.0, 0.0)
}

/// Serializable task settings; unset weights fall back to the variant's defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    pub variant: TaskVariant,
    /// Diagonal of `Q`.
    pub q: Option<[f64; 4]>,
    pub r: Option<f64>,
    pub state_des: Option<[f64; 4]>,
}

impl TaskConfig {
    pub fn new(variant: TaskVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Result<DesiredStateTask> {
        let q = self
            .q
            .map(|d| StateVec::new(d[0], d[1], d[2], d[3]))
            .unwrap_or_else(|| self.variant.default_q());
        let r = self.r.unwrap_or_else(|| self.variant.default_r());
        if q.iter().any(|w| !(w.is_finite() && *w >= 0.0)) || !(r.is_finite() && r >= 0.0) {
            return Err(FurutaError::InvalidConfig(format!(
                "reward weights must be finite and non-negative, got Q = {q:?}, R = {r}"
            )));
        }
        let state_des = self
            .state_des
            .map(|d| StateVec::new(d[0], d[1], d[2], d[3]))
            .unwrap_or_else(upright);

        let state_space = self.variant.state_space()?;
        let init_space = self.variant.init_space()?;
        if !init_space.is_subset_of(&state_space)? {
            return Err(FurutaError::InvalidConfig(
                "initial-state space is not contained in the state space".into(),
            ));
        }

        Ok(DesiredStateTask {
            state_des,
            q: Mat4::from_diagonal(&q),
            r,
            state_space,
        })
    }
}

/// Drive the state to `state_des`; the α error is taken modulo 2π so that
/// both upright configurations count as the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredStateTask {
    state_des: StateVec,
    q: Mat4,
    r: f64,
    state_space: BoxSpace,
}

impl DesiredStateTask {
    pub fn state_des(&self) -> &StateVec {
        &self.state_des
    }

    pub fn error(&self, x: &StateVec) -> StateVec {
        let mut e = self.state_des - x;
        e[1] = wrap_to_pi(e[1]);
        e
    }

    /// `exp(-(eᵀQe + uᵀRu))`, in `(0, 1]`.
    pub fn reward(&self, x: &StateVec, u: f64) -> f64 {
        let e = self.error(x);
        let cost = e.dot(&(self.q * e)) + self.r * u * u;
        (-cost).exp()
    }

    /// The state left the state space or stopped being finite.
    pub fn has_failed(&self, x: &StateVec) -> bool {
        !x.iter().all(|v| v.is_finite())
            || !self
                .state_space
                .contains(&DVec::from_column_slice(x.as_slice()))
                .unwrap_or(false)
    }
}
