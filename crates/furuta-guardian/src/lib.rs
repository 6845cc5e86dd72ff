//! Conservation monitoring for furuta simulations.
//!
//! This crate provides:
//! - Energy and arm angular momentum drift relative to a baseline
//! - A power-balance ledger that accounts for motor input and viscous losses
//! - Quality grading of a run from its conservation errors

pub mod conservation;
pub mod power;
pub mod quality;

pub use conservation::{ConservationMonitor, ConservationState, arm_momentum};
pub use power::PowerBalance;
pub use quality::SolverQuality;
