//! Recorded rollouts and their segmentation.

use furuta_math::StateVec;
use serde::{Deserialize, Serialize};

use crate::error::{Real2SimError, Result};

/// A recorded rollout: `states[k+1]` results from applying `actions[k]`
/// to `states[k]` for `dt` seconds.
///
/// `rewards` is either empty (e.g. hardware recordings) or has one entry per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub dt: f64,
    pub times: Vec<f64>,
    pub states: Vec<StateVec>,
    pub actions: Vec<f64>,
    #[serde(default)]
    pub rewards: Vec<f64>,
}

impl Trajectory {
    /// Empty trajectory starting at `x0`, time zero.
    pub fn new(dt: f64, x0: StateVec) -> Self {
        Self::starting_at(dt, 0.0, x0)
    }

    pub fn starting_at(dt: f64, t0: f64, x0: StateVec) -> Self {
        Self {
            dt,
            times: vec![t0],
            states: vec![x0],
            actions: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Append one transition.
    pub fn push(&mut self, action: f64, next: StateVec, reward: Option<f64>) {
        let t = self.times.last().copied().unwrap_or(0.0) + self.dt;
        self.actions.push(action);
        self.states.push(next);
        self.times.push(t);
        if let Some(r) = reward {
            self.rewards.push(r);
        }
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn initial_state(&self) -> Option<&StateVec> {
        self.states.first()
    }

    pub fn final_state(&self) -> Option<&StateVec> {
        self.states.last()
    }

    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    pub fn duration(&self) -> f64 {
        self.len() as f64 * self.dt
    }

    /// Check the length relations between the recorded series.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Real2SimError::InvalidTrajectory(msg));
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return invalid(format!("dt must be finite and positive, got {}", self.dt));
        }
        if self.states.len() != self.actions.len() + 1 {
            return invalid(format!(
                "{} states for {} actions",
                self.states.len(),
                self.actions.len()
            ));
        }
        if self.times.len() != self.states.len() {
            return invalid(format!(
                "{} times for {} states",
                self.times.len(),
                self.states.len()
            ));
        }
        if !self.rewards.is_empty() && self.rewards.len() != self.actions.len() {
            return invalid(format!(
                "{} rewards for {} actions",
                self.rewards.len(),
                self.actions.len()
            ));
        }
        Ok(())
    }

    /// Transitions `[start, end)` as a trajectory of its own.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        self.validate()?;
        if start > end || end > self.len() {
            return Err(Real2SimError::InvalidSegments(format!(
                "slice [{start}, {end}) out of range for {} steps",
                self.len()
            )));
        }
        Ok(Self {
            dt: self.dt,
            times: self.times[start..=end].to_vec(),
            states: self.states[start..=end].to_vec(),
            actions: self.actions[start..end].to_vec(),
            rewards: if self.rewards.is_empty() {
                Vec::new()
            } else {
                self.rewards[start..end].to_vec()
            },
        })
    }

    /// Cut into consecutive segments covering every transition once.
    pub fn split(&self, segmentation: SegmentSpec) -> Result<Vec<Self>> {
        self.validate()?;
        let bounds = segmentation.bounds(self.len())?;
        bounds.into_iter().map(|(a, b)| self.slice(a, b)).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let traj: Self = serde_json::from_str(json)?;
        traj.validate()?;
        Ok(traj)
    }
}

/// How to cut a trajectory into segments: by number or by length, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentSpec {
    /// This many segments of near-equal length, longer ones first.
    Count(usize),
    /// Segments of this many steps, the last one possibly shorter.
    Length(usize),
}

impl SegmentSpec {
    /// Build from the pair of optional settings; exactly one must be set.
    pub fn from_options(num_segments: Option<usize>, len_segments: Option<usize>) -> Result<Self> {
        match (num_segments, len_segments) {
            (Some(n), None) => Ok(Self::Count(n)),
            (None, Some(l)) => Ok(Self::Length(l)),
            _ => Err(Real2SimError::InvalidSegments(
                "exactly one of segment count and segment length must be given".into(),
            )),
        }
    }

    /// Half-open step ranges for a trajectory of `steps` transitions.
    pub fn bounds(self, steps: usize) -> Result<Vec<(usize, usize)>> {
        match self {
            Self::Count(n) => {
                if n == 0 || n > steps {
                    return Err(Real2SimError::InvalidSegments(format!(
                        "cannot cut {steps} steps into {n} segments"
                    )));
                }
                let (base, extra) = (steps / n, steps % n);
                let mut start = 0;
                Ok((0..n)
                    .map(|i| {
                        let len = base + usize::from(i < extra);
                        let range = (start, start + len);
                        start += len;
                        range
                    })
                    .collect())
            }
            Self::Length(l) => {
                if l == 0 || steps == 0 {
                    return Err(Real2SimError::InvalidSegments(format!(
                        "cannot cut {steps} steps into segments of length {l}"
                    )));
                }
                Ok((0..steps)
                    .step_by(l)
                    .map(|a| (a, (a + l).min(steps)))
                    .collect())
            }
        }
    }
}
