//! Ensemble simulation and uncertainty propagation.
//!
//! Every member runs the same action sequence under its own domain
//! parameters; the spread of the members measures how sensitive a motion
//! is to parameter uncertainty.

use furuta_math::StateVec;
use furuta_model::{DomainParams, Model};
use furuta_rigid::IntegratorKind;

use crate::error::{ProbError, Result};
use crate::randomizer::DomainRandomizer;

/// Many pendulum models stepped in lockstep.
#[derive(Debug, Clone)]
pub struct EnsembleSimulator {
    models: Vec<Model>,
    states: Vec<StateVec>,
    integrator: IntegratorKind,
    time: f64,
}

impl EnsembleSimulator {
    /// One member per parameter set, all starting at `x0` with `base`'s time step.
    pub fn new(
        base: &Model,
        params: &[DomainParams],
        x0: StateVec,
        integrator: IntegratorKind,
    ) -> Result<Self> {
        if params.is_empty() {
            return Err(ProbError::EmptyEnsemble);
        }
        let models = params
            .iter()
            .map(|p| -> Result<Model> {
                let mut m = base.clone();
                m.set_domain_params(*p)?;
                Ok(m)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            states: vec![x0; models.len()],
            models,
            integrator,
            time: 0.0,
        })
    }

    /// `n` members with parameters drawn from `randomizer`.
    pub fn from_randomizer(
        base: &Model,
        randomizer: &mut DomainRandomizer,
        n: usize,
        x0: StateVec,
        integrator: IntegratorKind,
    ) -> Result<Self> {
        let params = randomizer.sample_n(n);
        Self::new(base, &params, x0, integrator)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn states(&self) -> &[StateVec] {
        &self.states
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Put every member back at `x0`.
    pub fn reset(&mut self, x0: StateVec) {
        self.states.fill(x0);
        self.time = 0.0;
    }

    /// Advance every member by one step under action `u`.
    ///
    /// Fails on the first member whose step fails; states are then left as
    /// they were before the call.
    pub fn step(&mut self, u: f64) -> Result<()> {
        let next = self
            .models
            .iter()
            .zip(&self.states)
            .enumerate()
            .map(|(index, (model, x))| {
                self.integrator
                    .integrate(model, x, u, model.dt())
                    .map_err(|source| ProbError::Member { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        self.states = next;
        if let Some(m) = self.models.first() {
            self.time += m.dt();
        }
        Ok(())
    }

    /// Apply an action sequence; returns one trajectory per member,
    /// each starting with the current state.
    pub fn run(&mut self, actions: &[f64]) -> Result<Vec<Vec<StateVec>>> {
        let mut trajectories: Vec<Vec<StateVec>> = self
            .states
            .iter()
            .map(|x| {
                let mut t = Vec::with_capacity(actions.len() + 1);
                t.push(*x);
                t
            })
            .collect();
        for &u in actions {
            self.step(u)?;
            for (traj, x) in trajectories.iter_mut().zip(&self.states) {
                traj.push(*x);
            }
        }
        Ok(trajectories)
    }

    /// Mean and per-dimension standard deviation of the current states.
    pub fn statistics(&self) -> (StateVec, StateVec) {
        ensemble_statistics(&self.states)
    }
}

/// Mean and population standard deviation of a set of states.
pub fn ensemble_statistics(states: &[StateVec]) -> (StateVec, StateVec) {
    if states.is_empty() {
        return (StateVec::zeros(), StateVec::zeros());
    }
    let n = states.len() as f64;
    let mean = states.iter().fold(StateVec::zeros(), |acc, x| acc + x) / n;
    let var = states
        .iter()
        .fold(StateVec::zeros(), |acc, x| acc + (x - mean).component_mul(&(x - mean)))
        / n;
    (mean, var.map(f64::sqrt))
}

/// Mean ± std over members at every time step.
///
/// Trajectories may differ in length; each step uses the members that reach it.
pub fn trajectory_uncertainty(trajectories: &[Vec<StateVec>]) -> Vec<(StateVec, StateVec)> {
    let nsteps = trajectories.iter().map(Vec::len).max().unwrap_or(0);
    (0..nsteps)
        .map(|k| {
            let at_k: Vec<StateVec> = trajectories
                .iter()
                .filter_map(|t| t.get(k).copied())
                .collect();
            ensemble_statistics(&at_k)
        })
        .collect()
}
