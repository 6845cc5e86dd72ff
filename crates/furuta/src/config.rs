//! Environment configuration, loadable from JSON.

use std::collections::BTreeMap;

use furuta_model::{DEFAULT_DT, DomainParams};
use furuta_rigid::IntegratorKind;
use serde::{Deserialize, Serialize};

use crate::error::{FurutaError, Result};
use crate::task::{TaskConfig, TaskVariant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Control and integration step (s).
    pub dt: f64,
    /// Episode length in steps.
    pub max_steps: usize,
    pub task: TaskConfig,
    pub integrator: IntegratorKind,
    /// Overrides on top of the nominal domain parameters, by canonical name.
    pub domain_params: BTreeMap<String, f64>,
    /// Seed for initial-state sampling; drawn from entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            max_steps: 1500,
            task: TaskConfig::default(),
            integrator: IntegratorKind::default(),
            domain_params: BTreeMap::new(),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn new(variant: TaskVariant) -> Self {
        Self {
            task: TaskConfig::new(variant),
            ..Self::default()
        }
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_domain_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.domain_params.insert(name.into(), value);
        self
    }

    /// Nominal parameters with the configured overrides applied and validated.
    pub fn initial_domain_params(&self) -> Result<DomainParams> {
        Ok(DomainParams::nominal().merged(self.domain_params.iter().map(|(k, v)| (k, *v)))?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FurutaError::InvalidConfig(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        if self.max_steps == 0 {
            return Err(FurutaError::InvalidConfig("max_steps must be positive".into()));
        }
        self.initial_domain_params()?;
        self.task.build()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
