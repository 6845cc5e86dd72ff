//! Open-loop and observation-driven policies.

use std::f64::consts::PI;

use furuta_math::DVec;

use crate::error::{FurutaError, Result};

/// Maps an observation (and the current time) to an action.
pub trait Policy {
    fn act(&mut self, obs: &DVec, time: f64) -> Result<DVec>;

    /// Called at the start of every rollout.
    fn reset(&mut self) {}
}

/// Open-loop policy driven by a function of time, e.g. for system excitation.
pub struct TimePolicy<F>
where
    F: FnMut(f64) -> f64,
{
    fcn_of_time: F,
}

impl<F> TimePolicy<F>
where
    F: FnMut(f64) -> f64,
{
    pub fn new(fcn_of_time: F) -> Self {
        Self { fcn_of_time }
    }
}

impl<F> Policy for TimePolicy<F>
where
    F: FnMut(f64) -> f64,
{
    fn act(&mut self, _obs: &DVec, time: f64) -> Result<DVec> {
        Ok(DVec::from_element(1, (self.fcn_of_time)(time)))
    }
}

/// `amplitude · sin(2π·f·t)`.
pub fn sine(amplitude: f64, frequency: f64) -> impl Fn(f64) -> f64 + Clone {
    move |t| amplitude * (2.0 * PI * frequency * t).sin()
}

/// Linear chirp `amplitude · cos(2π(f0·t + (f1 − f0)/(2·t1)·t²))`, sweeping
/// from `f0` at `t = 0` to `f1` at `t = t1`.
pub fn linear_chirp(amplitude: f64, f0: f64, f1: f64, t1: f64) -> impl Fn(f64) -> f64 + Clone {
    let k = (f1 - f0) / t1;
    move |t| amplitude * (2.0 * PI * (f0 * t + 0.5 * k * t * t)).cos()
}

/// Replays a recorded action sequence, one action per call.
#[derive(Debug, Clone)]
pub struct PlaybackPolicy {
    actions: Vec<f64>,
    cursor: usize,
}

impl PlaybackPolicy {
    pub fn new(actions: Vec<f64>) -> Self {
        Self { actions, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions not yet played.
    pub fn remaining(&self) -> usize {
        self.actions.len() - self.cursor
    }
}

impl Policy for PlaybackPolicy {
    fn act(&mut self, _obs: &DVec, _time: f64) -> Result<DVec> {
        let u = self.actions.get(self.cursor).copied().ok_or_else(|| {
            FurutaError::InvalidConfig(format!(
                "playback exhausted after {} actions",
                self.actions.len()
            ))
        })?;
        self.cursor += 1;
        Ok(DVec::from_element(1, u))
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// `u = kᵀ·obs`, e.g. a stabilizing state-feedback gain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPolicy {
    gains: DVec,
}

impl LinearPolicy {
    pub fn new(gains: DVec) -> Self {
        Self { gains }
    }

    pub fn gains(&self) -> &DVec {
        &self.gains
    }
}

impl Policy for LinearPolicy {
    fn act(&mut self, obs: &DVec, _time: f64) -> Result<DVec> {
        crate::space::check_len("observation", self.gains.len(), obs.len())?;
        Ok(DVec::from_element(1, self.gains.dot(obs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sine() {
        let f = sine(1.0, 2.0);
        assert_relative_eq!(f(0.125), 1.0, epsilon = 1e-12);
        assert_relative_eq!(f(0.25), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_chirp_sweeps() {
        let f = linear_chirp(2.0, 5.0, 0.0, 10.0);
        assert_relative_eq!(f(0.0), 2.0);
        // Instantaneous frequency 5 Hz at the start: a full period after 0.2 s.
        assert_relative_eq!(f(0.2), 2.0, epsilon = 0.05);
        assert!((0..1000).all(|k| f(k as f64 * 0.01).abs() <= 2.0));
    }

    #[test]
    fn test_time_policy() {
        let mut p = TimePolicy::new(sine(1.5, 1.0));
        let u = p.act(&DVec::zeros(6), 0.25).unwrap();
        assert_relative_eq!(u[0], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_playback_exhausts_and_resets() {
        let mut p = PlaybackPolicy::new(vec![1.0, -1.0]);
        let obs = DVec::zeros(4);
        assert_eq!(p.act(&obs, 0.0).unwrap()[0], 1.0);
        assert_eq!(p.act(&obs, 0.0).unwrap()[0], -1.0);
        assert_eq!(p.remaining(), 0);
        assert!(p.act(&obs, 0.0).is_err());
        p.reset();
        assert_eq!(p.act(&obs, 0.0).unwrap()[0], 1.0);
    }

    #[test]
    fn test_linear_policy() {
        let mut p = LinearPolicy::new(DVec::from_vec(vec![1.0, 2.0]));
        let u = p.act(&DVec::from_vec(vec![3.0, -1.0]), 0.0).unwrap();
        assert_eq!(u[0], 1.0);
        assert!(p.act(&DVec::zeros(3), 0.0).is_err());
    }
}
