//! Hand-designed observation features for linear policies.
//!
//! A [`FeatureStack`] concatenates the outputs of its features in order.
//! Elementwise features map an `n`-dim input to `n` values, [`Feature::Const`]
//! yields one value and [`Feature::Product`] multiplies selected entries.

use furuta_math::Real;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{FurutaError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Const,
    Identity,
    Sign,
    Abs,
    Squared,
    Cubic,
    Sin,
    Cos,
    SinSin,
    SinCos,
    /// `1 / (1 + exp(-scale·x))`
    Sigmoid { scale: f64 },
    /// `exp(-scale·x²)`
    Bell { scale: f64 },
    /// Product of the inputs at these indices.
    Product(Vec<usize>),
}

impl Feature {
    /// Number of outputs for an input of `dim` entries.
    pub fn num_outputs(&self, dim: usize) -> usize {
        match self {
            Self::Const | Self::Product(_) => 1,
            _ => dim,
        }
    }

    fn eval_into<T: Real>(&self, inp: &[T], out: &mut Vec<T>) -> Result<()> {
        let elementwise =
            |f: &dyn Fn(T) -> T, out: &mut Vec<T>| out.extend(inp.iter().map(|&v| f(v)));
        match self {
            Self::Const => out.push(T::one()),
            Self::Identity => out.extend_from_slice(inp),
            Self::Sign => elementwise(&|v| v.signum(), out),
            Self::Abs => elementwise(&|v| v.abs(), out),
            Self::Squared => elementwise(&|v| v * v, out),
            Self::Cubic => elementwise(&|v| v * v * v, out),
            Self::Sin => elementwise(&|v| v.sin(), out),
            Self::Cos => elementwise(&|v| v.cos(), out),
            Self::SinSin => elementwise(&|v| v.sin() * v.sin(), out),
            Self::SinCos => elementwise(&|v| v.sin() * v.cos(), out),
            Self::Sigmoid { scale } => {
                let s = T::from_f64(*scale);
                elementwise(&|v| T::one() / (T::one() + (-(s * v)).exp()), out)
            }
            Self::Bell { scale } => {
                let s = T::from_f64(*scale);
                elementwise(&|v| (-(s * v * v)).exp(), out)
            }
            Self::Product(idcs) => {
                let mut prod = T::one();
                for &i in idcs {
                    let v = inp.get(i).ok_or(FurutaError::ShapeMismatch {
                        what: "product feature index",
                        expected: i + 1,
                        got: inp.len(),
                    })?;
                    prod = prod * *v;
                }
                out.push(prod);
            }
        }
        Ok(())
    }
}

/// Ordered collection of features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureStack {
    features: Vec<Feature>,
}

impl FeatureStack {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Constant plus identity, the usual linear-policy basis.
    pub fn linear() -> Self {
        Self::new(vec![Feature::Const, Feature::Identity])
    }

    pub fn push(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn num_outputs(&self, dim: usize) -> usize {
        self.features.iter().map(|f| f.num_outputs(dim)).sum()
    }

    pub fn eval<T: Real>(&self, inp: &[T]) -> Result<DVector<T>> {
        let mut out = Vec::with_capacity(self.num_outputs(inp.len()));
        for f in &self.features {
            f.eval_into(inp, &mut out)?;
        }
        Ok(DVector::from_vec(out))
    }
}
