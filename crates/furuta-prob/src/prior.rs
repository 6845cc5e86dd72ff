//! Uniform box prior over mapped domain parameters.

use furuta_math::DVec;
use furuta_model::DomainParams;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ProbError, Result};
use crate::mapping::ParamMapping;

/// Independent uniform distributions `U(low_i, high_i)` per mapped parameter.
///
/// Both bounds of every dimension lie in the parameter's validity range,
/// so every sample is a valid parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoxPriorBounds")]
pub struct BoxPrior {
    mapping: ParamMapping,
    low: DVec,
    high: DVec,
}

/// Unvalidated wire form of [`BoxPrior`].
#[derive(Deserialize)]
struct BoxPriorBounds {
    mapping: ParamMapping,
    low: DVec,
    high: DVec,
}

impl TryFrom<BoxPriorBounds> for BoxPrior {
    type Error = ProbError;

    fn try_from(b: BoxPriorBounds) -> Result<Self> {
        Self::new(b.mapping, b.low, b.high)
    }
}

impl BoxPrior {
    pub fn new(mapping: ParamMapping, low: DVec, high: DVec) -> Result<Self> {
        for bound in [&low, &high] {
            if bound.len() != mapping.len() {
                return Err(ProbError::DimensionMismatch {
                    expected: mapping.len(),
                    got: bound.len(),
                });
            }
        }
        for (i, p) in mapping.params().iter().enumerate() {
            let (lo, hi) = (low[i], high[i]);
            let validity = p.validity();
            if !(lo <= hi && validity.admits(lo) && validity.admits(hi)) {
                return Err(ProbError::InvalidBounds {
                    name: p.name(),
                    low: lo,
                    high: hi,
                });
            }
        }
        Ok(Self { mapping, low, high })
    }

    /// Box of relative half-width `rel` around the nominal values.
    pub fn around_nominal(mapping: ParamMapping, rel: f64) -> Result<Self> {
        let nominal = mapping.extract(&DomainParams::nominal());
        let low = nominal.map(|v| v * (1.0 - rel));
        let high = nominal.map(|v| v * (1.0 + rel));
        Self::new(mapping, low, high)
    }

    /// Prior used for identifying the swing-up hardware: every parameter,
    /// dampings from near zero, the rest within ±5..20 % of nominal.
    pub fn qube_default() -> Self {
        let n = DomainParams::nominal();
        let low = DVec::from_vec(vec![
            1e-8,
            1e-8,
            n.rm * 0.8,
            n.km * 0.8,
            n.mr * 0.9,
            n.mp * 0.9,
            n.lr * 0.9,
            n.lp * 0.9,
            n.g * 0.95,
        ]);
        let high = DVec::from_vec(vec![
            2.0 * 0.0015,
            2.0 * 0.0005,
            n.rm * 1.2,
            n.km * 1.2,
            n.mr * 1.1,
            n.mp * 1.1,
            n.lr * 1.1,
            n.lp * 1.1,
            n.g * 1.05,
        ]);
        Self {
            mapping: ParamMapping::all(),
            low,
            high,
        }
    }

    pub fn mapping(&self) -> &ParamMapping {
        &self.mapping
    }

    pub fn low(&self) -> &DVec {
        &self.low
    }

    pub fn high(&self) -> &DVec {
        &self.high
    }

    pub fn dim(&self) -> usize {
        self.mapping.len()
    }

    pub fn mean(&self) -> DVec {
        (&self.low + &self.high) * 0.5
    }

    /// Draw one flat parameter vector.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> DVec {
        DVec::from_iterator(
            self.dim(),
            (0..self.dim()).map(|i| {
                let u: f64 = rng.r#gen();
                self.low[i] + (self.high[i] - self.low[i]) * u
            }),
        )
    }

    /// Draw one parameter vector and write it into a copy of `base`.
    pub fn sample_params<R: Rng>(&self, rng: &mut R, base: &DomainParams) -> DomainParams {
        let v = self.sample(rng);
        self.mapping.apply_unchecked(base, v.as_slice())
    }

    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.dim()
            && values
                .iter()
                .enumerate()
                .all(|(i, v)| *v >= self.low[i] && *v <= self.high[i])
    }

    /// Clamp `values` into the box in place.
    pub fn project(&self, values: &mut DVec) {
        for (i, v) in values.iter_mut().enumerate().take(self.dim()) {
            *v = v.clamp(self.low[i], self.high[i]);
        }
    }

    /// Log density; `-inf` outside the box.
    pub fn log_prob(&self, values: &[f64]) -> f64 {
        if !self.contains(values) {
            return f64::NEG_INFINITY;
        }
        -(0..self.dim())
            .map(|i| (self.high[i] - self.low[i]).ln())
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mp_lp() -> ParamMapping {
        ParamMapping::from_names(["Mp", "Lp"]).unwrap()
    }

    #[test]
    fn test_new_validates_bounds() {
        let ok = BoxPrior::new(
            mp_lp(),
            DVec::from_vec(vec![0.02, 0.1]),
            DVec::from_vec(vec![0.03, 0.15]),
        );
        assert!(ok.is_ok());

        let inverted = BoxPrior::new(
            mp_lp(),
            DVec::from_vec(vec![0.03, 0.1]),
            DVec::from_vec(vec![0.02, 0.15]),
        );
        assert!(matches!(inverted, Err(ProbError::InvalidBounds { name: "Mp", .. })));

        let zero_length = BoxPrior::new(
            mp_lp(),
            DVec::from_vec(vec![0.02, 0.0]),
            DVec::from_vec(vec![0.03, 0.15]),
        );
        assert!(matches!(zero_length, Err(ProbError::InvalidBounds { name: "Lp", .. })));

        let short = BoxPrior::new(mp_lp(), DVec::from_vec(vec![0.02]), DVec::from_vec(vec![0.03]));
        assert!(matches!(short, Err(ProbError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_damping_may_start_at_zero() {
        let m = ParamMapping::from_names(["Dr"]).unwrap();
        let prior = BoxPrior::new(m, DVec::from_vec(vec![0.0]), DVec::from_vec(vec![1e-4]));
        assert!(prior.is_ok());
    }

    #[test]
    fn test_samples_inside_box() {
        let prior = BoxPrior::qube_default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let s = prior.sample(&mut rng);
            assert!(prior.contains(s.as_slice()));
            let p = prior.sample_params(&mut rng, &DomainParams::nominal());
            assert!(p.validate().is_ok());
        }
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let prior = BoxPrior::around_nominal(mp_lp(), 0.1).unwrap();
        let a = prior.sample(&mut StdRng::seed_from_u64(3));
        let b = prior.sample(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_project_and_log_prob() {
        let prior = BoxPrior::new(
            mp_lp(),
            DVec::from_vec(vec![0.02, 0.1]),
            DVec::from_vec(vec![0.04, 0.2]),
        )
        .unwrap();
        let mut v = DVec::from_vec(vec![0.05, 0.05]);
        assert_eq!(prior.log_prob(v.as_slice()), f64::NEG_INFINITY);
        prior.project(&mut v);
        assert_eq!(v.as_slice(), &[0.04, 0.1]);
        assert_relative_eq!(
            prior.log_prob(v.as_slice()),
            -(0.02f64.ln() + 0.1f64.ln()),
            epsilon = 1e-12
        );
        assert_relative_eq!(prior.mean()[0], 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_qube_default_is_valid() {
        let prior = BoxPrior::qube_default();
        let rebuilt = BoxPrior::new(
            prior.mapping().clone(),
            prior.low().clone(),
            prior.high().clone(),
        );
        assert!(rebuilt.is_ok());
        assert!(prior.contains(prior.mapping().extract(&DomainParams::nominal()).as_slice()));
    }
}
