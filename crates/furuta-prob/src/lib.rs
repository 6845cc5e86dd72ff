//! Domain randomization for furuta.
//!
//! Provides:
//! - Index to domain-parameter mappings for flat parameter vectors
//! - Uniform box priors over mapped parameters
//! - Seeded randomizers producing full parameter sets
//! - Ensemble simulation and uncertainty propagation across parameter sets

pub mod ensemble;
pub mod error;
pub mod mapping;
pub mod prior;
pub mod randomizer;

pub use ensemble::{EnsembleSimulator, ensemble_statistics, trajectory_uncertainty};
pub use error::{ProbError, Result};
pub use mapping::ParamMapping;
pub use prior::BoxPrior;
pub use randomizer::DomainRandomizer;
