use furuta_model::{DomainParam, ModelError};
use furuta_rigid::DynamicsError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("ensemble member {index}: {source}")]
    Member {
        index: usize,
        #[source]
        source: DynamicsError,
    },

    #[error("expected {expected} values, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("domain parameter {0} is mapped more than once")]
    DuplicateParam(DomainParam),

    #[error("parameter mapping is empty")]
    EmptyMapping,

    #[error("invalid prior bounds for {name}: [{low}, {high}]")]
    InvalidBounds {
        name: &'static str,
        low: f64,
        high: f64,
    },

    #[error("ensemble has no members")]
    EmptyEnsemble,
}

pub type Result<T> = std::result::Result<T, ProbError>;
