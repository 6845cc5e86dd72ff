//! Errors surfaced by the environment layer.

use furuta_model::ModelError;
use furuta_prob::ProbError;
use furuta_real2sim::Real2SimError;
use furuta_rigid::DynamicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FurutaError {
    #[error("shape mismatch in {what}: expected {expected} elements, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid space: {0}")]
    InvalidSpace(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("step called before reset")]
    NotReset,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error(transparent)]
    Prob(#[from] ProbError),

    #[error(transparent)]
    Real2Sim(#[from] Real2SimError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FurutaError>;
