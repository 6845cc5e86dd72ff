//! Real-to-simulation parameter identification for the rotary pendulum.
//!
//! A recorded [`Trajectory`] is cut into segments; each segment is replayed
//! in simulation from its recorded initial state with the recorded actions,
//! and the weighted state error is minimised over the mapped domain
//! parameters with gradient descent or Adam.

pub mod error;
pub mod matcher;
pub mod optimizer;
pub mod trajectory;

pub use error::{Real2SimError, Result};
pub use matcher::SegmentMatcher;
pub use optimizer::{
    AdamOptimizer, GradientDescentOptimizer, OptimizationResult, Optimizer, OptimizerConfig,
};
pub use trajectory::{SegmentSpec, Trajectory};
