//! Model definition: domain parameters, derived inertia terms and time step.

use tracing::debug;

use crate::constants::DerivedConstants;
use crate::error::{ModelError, Result};
use crate::params::{DomainParam, DomainParams};
use crate::{DEFAULT_DT, State};

/// Static description of the rotary pendulum.
///
/// Fields are private so the derived constants can never go stale: the only
/// way to change parameters is [`Model::set_domain_params`], which validates
/// and recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    params: DomainParams,
    consts: DerivedConstants,
    dt: f64,
}

impl Model {
    /// Model at nominal parameters.
    pub fn nominal(dt: f64) -> Result<Self> {
        Self::new(DomainParams::nominal(), dt)
    }

    pub fn new(params: DomainParams, dt: f64) -> Result<Self> {
        check_dt(dt)?;
        params.validate()?;
        Ok(Self {
            consts: DerivedConstants::from_params(&params),
            params,
            dt,
        })
    }

    #[inline]
    pub fn params(&self) -> &DomainParams {
        &self.params
    }

    #[inline]
    pub fn constants(&self) -> &DerivedConstants {
        &self.consts
    }

    /// Integration time step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Replace all domain parameters and recompute the derived constants.
    ///
    /// On error the model is left unchanged.
    pub fn set_domain_params(&mut self, params: DomainParams) -> Result<()> {
        params.validate()?;
        self.consts = DerivedConstants::from_params(&params);
        self.params = params;
        debug!(?params, "domain parameters set");
        Ok(())
    }

    /// Restore nominal parameters.
    pub fn reset_domain_params(&mut self) {
        self.params = DomainParams::nominal();
        self.consts = DerivedConstants::from_params(&self.params);
        debug!("domain parameters reset to nominal");
    }

    pub fn set_dt(&mut self, dt: f64) -> Result<()> {
        check_dt(dt)?;
        self.dt = dt;
        Ok(())
    }

    /// Zero state at the hanging equilibrium.
    pub fn default_state(&self) -> State {
        State::default()
    }
}

fn check_dt(dt: f64) -> Result<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidTimeStep(dt))
    }
}

/// Builder for constructing models.
pub struct ModelBuilder {
    params: DomainParams,
    dt: f64,
}

impl ModelBuilder {
    /// Start from nominal parameters and the default time step.
    pub fn new() -> Self {
        Self {
            params: DomainParams::nominal(),
            dt: DEFAULT_DT,
        }
    }

    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Replace the whole parameter set.
    pub fn domain_params(mut self, params: DomainParams) -> Self {
        self.params = params;
        self
    }

    /// Override one parameter.
    pub fn param(mut self, param: DomainParam, value: f64) -> Self {
        self.params = self.params.with(param, value);
        self
    }

    /// Build the model, validating parameters and time step.
    pub fn build(self) -> Result<Model> {
        Model::new(self.params, self.dt)
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builder_defaults() {
        let model = ModelBuilder::new().build().unwrap();
        assert_eq!(*model.params(), DomainParams::nominal());
        assert_relative_eq!(model.dt(), 0.004);
    }

    #[test]
    fn test_builder_rejects_zero_length() {
        let err = ModelBuilder::new()
            .param(DomainParam::Lp, 0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidParam { name: "Lp", .. }));
    }

    #[test]
    fn test_builder_rejects_bad_dt() {
        assert!(matches!(
            ModelBuilder::new().dt(0.0).build(),
            Err(ModelError::InvalidTimeStep(_))
        ));
        assert!(ModelBuilder::new().dt(f64::NAN).build().is_err());
    }

    #[test]
    fn test_set_domain_params_recomputes_constants() {
        let mut model = Model::nominal(0.01).unwrap();
        let heavier = DomainParams::nominal().with(DomainParam::Mp, 0.048);
        model.set_domain_params(heavier).unwrap();
        assert_eq!(model.params().mp, 0.048);
        assert_eq!(*model.constants(), DerivedConstants::from_params(&heavier));
    }

    #[test]
    fn test_invalid_set_leaves_model_unchanged() {
        let mut model = Model::nominal(0.01).unwrap();
        let before = model.clone();
        let bad = DomainParams::nominal().with(DomainParam::Mr, -1.0);
        assert!(model.set_domain_params(bad).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_reset_domain_params() {
        let mut model = Model::nominal(0.01).unwrap();
        model
            .set_domain_params(DomainParams::nominal().with(DomainParam::G, 1.62))
            .unwrap();
        model.reset_domain_params();
        assert_eq!(*model.params(), DomainParams::nominal());
        assert_eq!(
            *model.constants(),
            DerivedConstants::from_params(&DomainParams::nominal())
        );
    }
}
