use thiserror::Error;

/// Numerical failures of the equations of motion or the integrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DynamicsError {
    #[error("mass matrix is singular or non-finite at alpha = {alpha}")]
    Degenerate { alpha: f64 },

    #[error("integrator produced a non-finite state {state:?}")]
    NonFinite { state: [f64; 4] },
}

pub type Result<T> = std::result::Result<T, DynamicsError>;
