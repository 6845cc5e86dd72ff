//! Model and state types for the furuta rotary pendulum.
//!
//! [`DomainParams`] holds the randomizable physical constants, [`DerivedConstants`]
//! the inertia terms computed from them. A [`Model`] bundles both with the
//! integration step and is the only place parameters change on a live simulator.
//! [`State`] is the mutable simulation state `[θ, α, θ̇, α̇]` plus time.

pub mod constants;
pub mod error;
pub mod model;
pub mod params;
pub mod state;

pub use constants::DerivedConstants;
pub use error::{ModelError, Result};
pub use model::{Model, ModelBuilder};
pub use params::{DomainParam, DomainParams, Validity};
pub use state::State;

/// Maximum motor voltage magnitude (V).
pub const MAX_ACT_VOLTAGE: f64 = 5.0;

/// Default integration step (s), 250 Hz control.
pub const DEFAULT_DT: f64 = 1.0 / 250.0;
