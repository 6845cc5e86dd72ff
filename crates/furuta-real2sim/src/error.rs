use furuta_model::ModelError;
use furuta_prob::ProbError;
use furuta_rigid::DynamicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Real2SimError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Dynamics(#[from] DynamicsError),

    #[error(transparent)]
    Prob(#[from] ProbError),

    #[error("trajectory JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid trajectory: {0}")]
    InvalidTrajectory(String),

    #[error("invalid segmentation: {0}")]
    InvalidSegments(String),
}

pub type Result<T> = std::result::Result<T, Real2SimError>;
