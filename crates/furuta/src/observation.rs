//! Observation transforms from the raw pendulum state.

use furuta_math::{DVec, Real, StateVec};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::space::check_len;

/// How a state is presented to a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationProjector {
    /// `[sin θ, cos θ, sin α, cos α, θ̇, α̇]`, continuous across angle wraps.
    #[default]
    Trig,
    /// The state itself.
    Identity,
}

impl ObservationProjector {
    pub fn dim(self) -> usize {
        match self {
            Self::Trig => 6,
            Self::Identity => 4,
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Trig => &[
                "sin_theta",
                "cos_theta",
                "sin_alpha",
                "cos_alpha",
                "theta_dot",
                "alpha_dot",
            ],
            Self::Identity => &["theta", "alpha", "theta_dot", "alpha_dot"],
        }
    }

    pub fn project(self, x: &StateVec) -> DVec {
        match self {
            Self::Trig => {
                let (st, ct) = x[0].sin_cos();
                let (sa, ca) = x[1].sin_cos();
                DVec::from_vec(vec![st, ct, sa, ca, x[2], x[3]])
            }
            Self::Identity => DVec::from_column_slice(x.as_slice()),
        }
    }

    /// Same transform on any scalar, e.g. dual numbers carrying derivatives.
    pub fn project_generic<T: Real>(self, x: &[T]) -> Result<DVector<T>> {
        check_len("state", 4, x.len())?;
        Ok(match self {
            Self::Trig => DVector::from_vec(vec![
                x[0].sin(),
                x[0].cos(),
                x[1].sin(),
                x[1].cos(),
                x[2],
                x[3],
            ]),
            Self::Identity => DVector::from_column_slice(x),
        })
    }

    /// Recover `[θ, α]` modulo 2π from an observation.
    pub fn angles(self, obs: &DVec) -> Result<(f64, f64)> {
        check_len("observation", self.dim(), obs.len())?;
        Ok(match self {
            Self::Trig => (obs[0].atan2(obs[1]), obs[2].atan2(obs[3])),
            Self::Identity => (obs[0], obs[1]),
        })
    }
}
