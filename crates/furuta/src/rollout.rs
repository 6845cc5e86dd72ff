//! Run a policy in an environment and record what happened.

use furuta_math::DVec;
use furuta_real2sim::Trajectory;
use tracing::debug;

use crate::env::QubeSim;
use crate::error::{FurutaError, Result};
use crate::policy::Policy;

/// One episode until `done`. Records the applied (clipped) actions and the
/// per-step rewards.
pub fn rollout<P: Policy + ?Sized>(
    env: &mut QubeSim,
    policy: &mut P,
    init: Option<&DVec>,
) -> Result<Trajectory> {
    let mut obs = env.reset(init)?;
    policy.reset();
    let state = env.state().ok_or(FurutaError::NotReset)?;
    let mut traj = Trajectory::new(env.dt(), state.x);

    loop {
        let time = env.state().map_or(0.0, |s| s.time);
        let act = policy.act(&obs, time)?;
        let res = env.step(&act)?;
        traj.push(res.info.applied_action, res.info.state, Some(res.reward));
        obs = res.obs;
        if res.done {
            debug!(
                steps = traj.len(),
                total_reward = traj.total_reward(),
                termination = ?res.info.termination,
                "rollout finished"
            );
            return Ok(traj);
        }
    }
}
