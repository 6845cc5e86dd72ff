//! The Qube environment: reset, step, observe, randomize.

use furuta_math::{DVec, StateVec};
use furuta_model::{DomainParams, Model, State};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Simulator;
use crate::config::SimConfig;
use crate::error::{FurutaError, Result};
use crate::observation::ObservationProjector;
use crate::render::FrameSink;
use crate::space::{BoxSpace, check_len};
use crate::task::{DesiredStateTask, Spaces};

/// Why an episode ended, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The state left the state space.
    Failed,
    /// The step budget was used up.
    TimeLimit,
}

/// Auxiliary per-step information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// State after the step.
    pub state: StateVec,
    /// Voltage actually applied after clipping.
    pub applied_action: f64,
    pub time: f64,
    pub step: usize,
    pub termination: Option<Termination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub obs: DVec,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Simulated Quanser Qube.
///
/// Owns its state between `reset` and `step`; parameter changes take
/// `&mut self` and so can never interleave with a step in progress.
pub struct QubeSim {
    config: SimConfig,
    model: Model,
    sim: Simulator,
    initial_params: DomainParams,
    task: DesiredStateTask,
    spaces: Spaces,
    projector: ObservationProjector,
    state: Option<State>,
    steps: usize,
    rng: StdRng,
    sink: Option<Box<dyn FrameSink>>,
}

impl std::fmt::Debug for QubeSim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QubeSim")
            .field("config", &self.config)
            .field("solver", &self.sim.solver_name())
            .field("params", self.model.params())
            .field("state", &self.state)
            .field("steps", &self.steps)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl QubeSim {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let initial_params = config.initial_domain_params()?;
        let model = Model::new(initial_params, config.dt)?;
        let variant = config.task.variant;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            ?variant,
            dt = config.dt,
            integrator = ?config.integrator,
            "created qube environment"
        );
        Ok(Self {
            task: config.task.build()?,
            spaces: variant.spaces()?,
            projector: variant.projector(),
            sim: Simulator::from_kind(config.integrator),
            config,
            model,
            initial_params,
            state: None,
            steps: 0,
            rng,
            sink: None,
        })
    }

    /// Start an episode from `init`, or from a sample of the init space.
    ///
    /// An explicit initial state must lie in the state space.
    pub fn reset(&mut self, init: Option<&DVec>) -> Result<DVec> {
        let x0 = match init {
            Some(x) => {
                if !self.spaces.state.contains(x)? {
                    return Err(FurutaError::InvalidConfig(format!(
                        "initial state {:?} outside the state space",
                        x.as_slice()
                    )));
                }
                x.clone()
            }
            None => self.spaces.init.sample(&mut self.rng),
        };
        let x0 = StateVec::from_column_slice(x0.as_slice());
        debug!(x0 = ?x0.as_slice(), "reset");
        self.state = Some(State::new(x0));
        self.steps = 0;
        Ok(self.projector.project(&x0))
    }

    /// Clip the action, advance one `dt`, score and check termination.
    ///
    /// The reward scores the state the action was applied in, together with
    /// the commanded (unclipped) action.
    pub fn step(&mut self, action: &DVec) -> Result<StepResult> {
        check_len("action", self.spaces.act.dim(), action.len())?;
        let state = self.state.as_mut().ok_or(FurutaError::NotReset)?;
        let u = self.spaces.act.clip(action)?[0];

        let reward = self.task.reward(&state.x, action[0]);
        self.sim.step(&self.model, state, u)?;
        self.steps += 1;

        let termination = if self.task.has_failed(&state.x) {
            warn!(
                step = self.steps,
                state = ?state.x.as_slice(),
                "state left the state space, ending episode"
            );
            Some(Termination::Failed)
        } else if self.steps >= self.config.max_steps {
            Some(Termination::TimeLimit)
        } else {
            None
        };

        if let Some(sink) = self.sink.as_mut() {
            sink.push_frame(state, self.model.params());
        }

        Ok(StepResult {
            obs: self.projector.project(&state.x),
            reward,
            done: termination.is_some(),
            info: StepInfo {
                state: state.x,
                applied_action: u,
                time: state.time,
                step: self.steps,
                termination,
            },
        })
    }

    /// Observation of the current state.
    pub fn observe(&self) -> Result<DVec> {
        let state = self.state.as_ref().ok_or(FurutaError::NotReset)?;
        Ok(self.projector.project(&state.x))
    }

    /// Replace all domain parameters; derived constants follow immediately.
    pub fn set_domain_params(&mut self, params: DomainParams) -> Result<()> {
        self.model.set_domain_params(params)?;
        Ok(())
    }

    /// Back to the parameters the environment was configured with.
    pub fn reset_domain_params(&mut self) -> Result<()> {
        self.set_domain_params(self.initial_params)
    }

    pub fn domain_params(&self) -> &DomainParams {
        self.model.params()
    }

    pub fn nominal_domain_params() -> DomainParams {
        DomainParams::nominal()
    }

    pub fn attach_sink(&mut self, sink: Box<dyn FrameSink>) {
        self.sink = Some(sink);
    }

    pub fn detach_sink(&mut self) -> Option<Box<dyn FrameSink>> {
        self.sink.take()
    }

    pub fn spaces(&self) -> &Spaces {
        &self.spaces
    }

    pub fn state_space(&self) -> &BoxSpace {
        &self.spaces.state
    }

    pub fn obs_space(&self) -> &BoxSpace {
        &self.spaces.obs
    }

    pub fn act_space(&self) -> &BoxSpace {
        &self.spaces.act
    }

    pub fn init_space(&self) -> &BoxSpace {
        &self.spaces.init
    }

    pub fn projector(&self) -> ObservationProjector {
        self.projector
    }

    pub fn task(&self) -> &DesiredStateTask {
        &self.task
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn dt(&self) -> f64 {
        self.model.dt()
    }

    pub fn solver_name(&self) -> &'static str {
        self.sim.solver_name()
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps
    }

    /// Current state, `None` before the first reset.
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    pub fn current_step(&self) -> usize {
        self.steps
    }
}
