//! furuta: rotary inverted pendulum (Quanser Qube) simulation core.
//!
//! This is the umbrella crate: it owns the `Simulator` and the `QubeSim`
//! environment and re-exports the core types from the sub-crates.

pub mod config;
pub mod env;
pub mod error;
pub mod features;
pub mod observation;
pub mod policy;
pub mod render;
pub mod rollout;
pub mod space;
pub mod task;

pub use config::SimConfig;
pub use env::{QubeSim, StepInfo, StepResult, Termination};
pub use error::{FurutaError, Result};
pub use features::{Feature, FeatureStack};
pub use observation::ObservationProjector;
pub use policy::{LinearPolicy, PlaybackPolicy, Policy, TimePolicy, linear_chirp, sine};
pub use render::{Frame, FrameRecorder, FrameSink};
pub use rollout::rollout;
pub use space::BoxSpace;
pub use task::{DesiredStateTask, Spaces, TaskConfig, TaskVariant};

pub use furuta_diff::{self, Linearization, StepJacobians};
pub use furuta_guardian::{self};
pub use furuta_math::{self, DVec, Dual, Real, StateVec};
pub use furuta_model::{
    self, DomainParam, DomainParams, MAX_ACT_VOLTAGE, Model, ModelBuilder, State,
};
pub use furuta_prob::{self, BoxPrior, DomainRandomizer, ParamMapping};
pub use furuta_real2sim::{self, SegmentMatcher, Trajectory};
pub use furuta_rigid::{
    self, FrozenAccelerationRk4Solver, IntegratorKind, Rk4Solver, Solver, derivative,
};

/// Step used for finite-difference step Jacobians.
const JACOBIAN_EPS: f64 = 1e-7;

/// Main simulation driver.
///
/// Thin wrapper over a boxed [`Solver`] that keeps [`State`] bookkeeping
/// (time, last control) in one place. [`QubeSim`] steps through one built
/// from its configured integrator.
pub struct Simulator {
    solver: Box<dyn Solver>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// Create a simulator with the default (textbook RK4) solver.
    pub fn new() -> Self {
        Self::from_kind(IntegratorKind::default())
    }

    /// Create a simulator with the RK4 solver.
    pub fn rk4() -> Self {
        Self::with_solver(Box::new(Rk4Solver))
    }

    /// Create a simulator with the frozen-acceleration RK4 variant.
    pub fn frozen_acceleration_rk4() -> Self {
        Self::with_solver(Box::new(FrozenAccelerationRk4Solver))
    }

    /// Create a simulator with a custom solver.
    pub fn with_solver(solver: Box<dyn Solver>) -> Self {
        Self { solver }
    }

    pub fn from_kind(kind: IntegratorKind) -> Self {
        Self::with_solver(kind.solver())
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Advance by one `model.dt()` under voltage `u`.
    ///
    /// `u` is applied as given; clipping to the actuator range is the
    /// environment's job. On error `state` is left untouched.
    pub fn step(&self, model: &Model, state: &mut State, u: f64) -> Result<()> {
        state.x = self.solver.integrate(model, &state.x, u, model.dt())?;
        state.ctrl = u;
        state.time += model.dt();
        Ok(())
    }

    /// Advance by one step and return the finite-difference step Jacobians
    /// at the pre-step state.
    pub fn step_with_jacobians(
        &self,
        model: &Model,
        state: &mut State,
        u: f64,
    ) -> Result<StepJacobians> {
        let jac = furuta_diff::finite_diff_step_jacobians(
            model,
            self.solver.as_ref(),
            &state.x,
            u,
            model.dt(),
            JACOBIAN_EPS,
        )?;
        self.step(model, state, u)?;
        Ok(jac)
    }

    /// Run `n` steps under constant voltage `u`.
    pub fn simulate(&self, model: &Model, state: &mut State, u: f64, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step(model, state, u)?;
        }
        Ok(())
    }

    /// Apply an action sequence and return the visited states, starting
    /// with the current one.
    pub fn simulate_actions(
        &self,
        model: &Model,
        state: &mut State,
        actions: &[f64],
    ) -> Result<Vec<StateVec>> {
        let mut states = Vec::with_capacity(actions.len() + 1);
        states.push(state.x);
        for &u in actions {
            self.step(model, state, u)?;
            states.push(state.x);
        }
        Ok(states)
    }
}
