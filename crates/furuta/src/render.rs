//! Optional per-step frame output.

use furuta_math::StateVec;
use furuta_model::{DomainParams, State};
use serde::{Deserialize, Serialize};

/// Receives one frame per environment step. Implementations draw, stream
/// or record; the environment never waits on them.
pub trait FrameSink: Send {
    fn push_frame(&mut self, state: &State, params: &DomainParams);
}

/// One recorded frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub time: f64,
    pub state: StateVec,
    /// Applied voltage.
    pub ctrl: f64,
    /// Arm tip in the horizontal plane, `(Lr·cos θ, Lr·sin θ)`.
    pub arm_tip: [f64; 2],
    /// Pendulum tip height relative to the pivot, `-Lp·cos α`.
    pub pendulum_height: f64,
}

/// Keeps every frame in memory, with the link geometry a 2D renderer needs.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    frames: Vec<Frame>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.frames)
    }
}

impl FrameSink for FrameRecorder {
    fn push_frame(&mut self, state: &State, params: &DomainParams) {
        let (s, c) = state.theta().sin_cos();
        self.frames.push(Frame {
            time: state.time,
            state: state.x,
            ctrl: state.ctrl,
            arm_tip: [params.lr * c, params.lr * s],
            pendulum_height: -params.lp * state.alpha().cos(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_geometry() {
        let params = DomainParams::nominal();
        let mut rec = FrameRecorder::new();
        rec.push_frame(&State::from_array([PI / 2.0, PI, 0.0, 0.0]), &params);
        let f = &rec.frames()[0];
        assert_relative_eq!(f.arm_tip[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(f.arm_tip[1], params.lr);
        assert_relative_eq!(f.pendulum_height, params.lp);
        assert!(rec.to_json().unwrap().contains("pendulum_height"));
    }
}
