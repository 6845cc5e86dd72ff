//! Domain parameters of the Quanser Qube rotary pendulum.
//!
//! These are the physical constants an outer loop randomizes or identifies.
//! A parameter set is a plain value: build a new one with [`DomainParams::with`]
//! or [`DomainParams::merged`] and hand it to the model wholesale.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Admissible range of a domain parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Strictly positive and finite.
    Positive,
    /// Non-negative and finite.
    NonNegative,
}

impl Validity {
    pub fn admits(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Validity::Positive => value > 0.0,
                Validity::NonNegative => value >= 0.0,
            }
    }

    fn requirement(self) -> &'static str {
        match self {
            Validity::Positive => "finite and > 0",
            Validity::NonNegative => "finite and >= 0",
        }
    }
}

/// Name of a single domain parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DomainParam {
    /// Gravitational acceleration (m/s²).
    #[serde(rename = "g")]
    G,
    /// Motor armature resistance (Ω).
    Rm,
    /// Motor back-EMF / torque constant (V·s/rad).
    #[serde(rename = "km")]
    Km,
    /// Rotary arm mass (kg).
    Mr,
    /// Rotary arm length (m).
    Lr,
    /// Rotary arm viscous damping (N·m·s/rad).
    Dr,
    /// Pendulum link mass (kg).
    Mp,
    /// Pendulum link length (m).
    Lp,
    /// Pendulum link viscous damping (N·m·s/rad).
    Dp,
}

impl DomainParam {
    /// All parameters in canonical order.
    pub const ALL: [DomainParam; 9] = [
        DomainParam::G,
        DomainParam::Rm,
        DomainParam::Km,
        DomainParam::Mr,
        DomainParam::Lr,
        DomainParam::Dr,
        DomainParam::Mp,
        DomainParam::Lp,
        DomainParam::Dp,
    ];

    /// Canonical name as used in parameter dictionaries.
    pub fn name(self) -> &'static str {
        match self {
            DomainParam::G => "g",
            DomainParam::Rm => "Rm",
            DomainParam::Km => "km",
            DomainParam::Mr => "Mr",
            DomainParam::Lr => "Lr",
            DomainParam::Dr => "Dr",
            DomainParam::Mp => "Mp",
            DomainParam::Lp => "Lp",
            DomainParam::Dp => "Dp",
        }
    }

    pub fn validity(self) -> Validity {
        match self {
            DomainParam::G | DomainParam::Km | DomainParam::Dr | DomainParam::Dp => {
                Validity::NonNegative
            }
            DomainParam::Rm
            | DomainParam::Mr
            | DomainParam::Lr
            | DomainParam::Mp
            | DomainParam::Lp => Validity::Positive,
        }
    }

    /// Check a candidate value against this parameter's validity range.
    pub fn check(self, value: f64) -> Result<()> {
        let validity = self.validity();
        if validity.admits(value) {
            Ok(())
        } else {
            Err(ModelError::InvalidParam {
                name: self.name(),
                value,
                requirement: validity.requirement(),
            })
        }
    }
}

impl fmt::Display for DomainParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DomainParam {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        DomainParam::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ModelError::UnknownParam(s.to_string()))
    }
}

/// Full set of domain parameters.
///
/// Deserializing fills missing entries from [`DomainParams::nominal`], so a
/// JSON object with only `{"Mp": 0.03}` is a valid override set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DomainParams {
    pub g: f64,
    #[serde(rename = "Rm")]
    pub rm: f64,
    pub km: f64,
    #[serde(rename = "Mr")]
    pub mr: f64,
    #[serde(rename = "Lr")]
    pub lr: f64,
    #[serde(rename = "Dr")]
    pub dr: f64,
    #[serde(rename = "Mp")]
    pub mp: f64,
    #[serde(rename = "Lp")]
    pub lp: f64,
    #[serde(rename = "Dp")]
    pub dp: f64,
}

impl Default for DomainParams {
    fn default() -> Self {
        Self::nominal()
    }
}

impl DomainParams {
    /// Baseline parameters of the Quanser Qube.
    pub fn nominal() -> Self {
        Self {
            g: 9.81,
            rm: 8.4,
            km: 0.042,
            mr: 0.095,
            lr: 0.085,
            dr: 5e-6,
            mp: 0.024,
            lp: 0.129,
            dp: 1e-6,
        }
    }

    pub fn get(&self, param: DomainParam) -> f64 {
        match param {
            DomainParam::G => self.g,
            DomainParam::Rm => self.rm,
            DomainParam::Km => self.km,
            DomainParam::Mr => self.mr,
            DomainParam::Lr => self.lr,
            DomainParam::Dr => self.dr,
            DomainParam::Mp => self.mp,
            DomainParam::Lp => self.lp,
            DomainParam::Dp => self.dp,
        }
    }

    fn slot(&mut self, param: DomainParam) -> &mut f64 {
        match param {
            DomainParam::G => &mut self.g,
            DomainParam::Rm => &mut self.rm,
            DomainParam::Km => &mut self.km,
            DomainParam::Mr => &mut self.mr,
            DomainParam::Lr => &mut self.lr,
            DomainParam::Dr => &mut self.dr,
            DomainParam::Mp => &mut self.mp,
            DomainParam::Lp => &mut self.lp,
            DomainParam::Dp => &mut self.dp,
        }
    }

    /// Copy with a single parameter replaced. Not validated.
    pub fn with(mut self, param: DomainParam, value: f64) -> Self {
        *self.slot(param) = value;
        self
    }

    /// Look up a parameter by its canonical name.
    pub fn get_by_name(&self, name: &str) -> Result<f64> {
        Ok(self.get(name.parse()?))
    }

    /// New parameter set from `self` with named overrides applied.
    ///
    /// Unknown names are rejected and the result is validated.
    pub fn merged<I, K>(&self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut out = *self;
        for (name, value) in overrides {
            let param: DomainParam = name.as_ref().parse()?;
            *out.slot(param) = value;
        }
        out.validate()?;
        Ok(out)
    }

    /// Nominal parameters with named overrides applied.
    pub fn from_map<I, K>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        Self::nominal().merged(overrides)
    }

    /// Name to value dictionary in canonical order.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        DomainParam::ALL
            .into_iter()
            .map(|p| (p.name().to_string(), self.get(p)))
            .collect()
    }

    /// Check every parameter against its validity range.
    pub fn validate(&self) -> Result<()> {
        DomainParam::ALL
            .into_iter()
            .try_for_each(|p| p.check(self.get(p)))
    }
}
