//! Errors raised while configuring a pendulum model.

use thiserror::Error;

/// Errors from domain-parameter handling and model construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unknown domain parameter '{0}'")]
    UnknownParam(String),

    #[error("domain parameter {name} = {value} is invalid: must be {requirement}")]
    InvalidParam {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
