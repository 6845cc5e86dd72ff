//! Segment-wise trajectory matching.
//!
//! Replaying a long recording open-loop diverges quickly for an unstable
//! system, so the recording is cut into segments and every segment is
//! restarted from its own recorded initial state.

use furuta_math::{DVec, StateVec, wrap_to_pi};
use furuta_model::{DomainParams, Model};
use furuta_prob::ParamMapping;
use furuta_rigid::IntegratorKind;

use crate::error::{Real2SimError, Result};
use crate::trajectory::{SegmentSpec, Trajectory};

/// Weighted squared-error loss between recorded and simulated segments.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    segments: Vec<Trajectory>,
    mapping: ParamMapping,
    base: DomainParams,
    /// Per-dimension weights on `[θ, α, θ̇, α̇]` errors.
    pub weights: StateVec,
    pub integrator: IntegratorKind,
}

impl SegmentMatcher {
    /// Segment `reference` and match the parameters in `mapping`;
    /// unmapped parameters stay at `base`.
    pub fn new(
        reference: &Trajectory,
        segmentation: SegmentSpec,
        mapping: ParamMapping,
        base: DomainParams,
    ) -> Result<Self> {
        reference.validate()?;
        base.validate()?;
        Ok(Self {
            segments: reference.split(segmentation)?,
            mapping,
            base,
            weights: StateVec::new(1.0, 1.0, 0.1, 0.1),
            integrator: IntegratorKind::default(),
        })
    }

    pub fn with_weights(mut self, weights: StateVec) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn segments(&self) -> &[Trajectory] {
        &self.segments
    }

    pub fn mapping(&self) -> &ParamMapping {
        &self.mapping
    }

    pub fn base(&self) -> &DomainParams {
        &self.base
    }

    /// Full parameter set for a flat vector of mapped values.
    pub fn params_for(&self, values: &[f64]) -> Result<DomainParams> {
        Ok(self.mapping.apply(&self.base, values)?)
    }

    /// Replay one segment's actions from its initial state.
    pub fn simulate_segment(&self, model: &Model, segment: &Trajectory) -> Result<Vec<StateVec>> {
        let Some(&x0) = segment.initial_state() else {
            return Err(Real2SimError::InvalidTrajectory("segment has no initial state".into()));
        };
        let mut states = Vec::with_capacity(segment.states.len());
        let mut x = x0;
        states.push(x);
        for &u in &segment.actions {
            x = self.integrator.integrate(model, &x, u, segment.dt)?;
            states.push(x);
        }
        Ok(states)
    }

    /// Weighted squared error of one state pair, angles compared modulo 2π.
    fn state_error(&self, real: &StateVec, sim: &StateVec) -> f64 {
        let mut e = real - sim;
        e[0] = wrap_to_pi(e[0]);
        e[1] = wrap_to_pi(e[1]);
        e.component_mul(&e).dot(&self.weights)
    }

    /// Mean weighted squared state error over all simulated steps of all segments.
    pub fn loss(&self, values: &[f64]) -> Result<f64> {
        let params = self.params_for(values)?;
        let dt = self.segments.first().map_or(1.0, |s| s.dt);
        let model = Model::new(params, dt)?;

        let mut total = 0.0;
        let mut count = 0usize;
        for seg in &self.segments {
            let sim = self.simulate_segment(&model, seg)?;
            for (real, simulated) in seg.states.iter().zip(&sim).skip(1) {
                total += self.state_error(real, simulated);
                count += 1;
            }
        }
        Ok(if count > 0 { total / count as f64 } else { 0.0 })
    }

    /// Loss at the base parameters.
    pub fn base_loss(&self) -> Result<f64> {
        self.loss(self.mapping.extract(&self.base).as_slice())
    }

    /// Central-difference gradient with step `eps · max(|v_i|, 1)`.
    ///
    /// Falls back to a forward difference where the backward probe would
    /// leave the parameter's validity range, e.g. a damping of zero.
    pub fn numerical_gradient(&self, values: &[f64], eps: f64) -> Result<DVec> {
        self.params_for(values)?;
        let mut grad = DVec::zeros(values.len());
        let mut probe = values.to_vec();
        let mut center = None;
        for (i, param) in self.mapping.params().iter().enumerate() {
            let v = values[i];
            let h = eps * v.abs().max(1.0);
            probe[i] = v + h;
            let plus = self.loss(&probe)?;
            probe[i] = v - h;
            grad[i] = if param.validity().admits(probe[i]) {
                (plus - self.loss(&probe)?) / (2.0 * h)
            } else {
                let here = match center {
                    Some(loss) => loss,
                    None => *center.insert(self.loss(values)?),
                };
                (plus - here) / h
            };
            probe[i] = v;
        }
        Ok(grad)
    }
}
