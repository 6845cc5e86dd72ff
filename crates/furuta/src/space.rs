//! Box-shaped spaces for states, observations, actions and initial states.

use furuta_math::DVec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FurutaError, Result};

/// Axis-aligned box `low ≤ x ≤ high` with one label per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: DVec,
    high: DVec,
    labels: Vec<String>,
}

impl BoxSpace {
    /// Bounds may be infinite but never NaN, and `low ≤ high` elementwise.
    pub fn new<S: Into<String>>(
        low: DVec,
        high: DVec,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        check_len("space upper bound", low.len(), high.len())?;
        check_len("space labels", low.len(), labels.len())?;
        for i in 0..low.len() {
            if low[i].is_nan() || high[i].is_nan() || low[i] > high[i] {
                return Err(FurutaError::InvalidSpace(format!(
                    "dimension '{}' has bounds [{}, {}]",
                    labels[i], low[i], high[i]
                )));
            }
        }
        Ok(Self { low, high, labels })
    }

    /// Box symmetric around zero.
    pub fn symmetric<S: Into<String>>(
        bound: DVec,
        labels: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Self::new(-&bound, bound, labels)
    }

    pub fn low(&self) -> &DVec {
        &self.low
    }

    pub fn high(&self) -> &DVec {
        &self.high
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Uniform sample.
    ///
    /// Dimensions with an infinite bound are sampled within one unit of the
    /// finite bound, or in `[-1, 1]` when both are infinite.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> DVec {
        DVec::from_iterator(
            self.dim(),
            (0..self.dim()).map(|i| {
                let (lo, hi) = match (self.low[i].is_finite(), self.high[i].is_finite()) {
                    (true, true) => (self.low[i], self.high[i]),
                    (true, false) => (self.low[i], self.low[i] + 1.0),
                    (false, true) => (self.high[i] - 1.0, self.high[i]),
                    (false, false) => (-1.0, 1.0),
                };
                lo + rng.r#gen::<f64>() * (hi - lo)
            }),
        )
    }

    pub fn contains(&self, x: &DVec) -> Result<bool> {
        check_len("space element", self.dim(), x.len())?;
        Ok(x.iter()
            .zip(self.low.iter().zip(self.high.iter()))
            .all(|(v, (lo, hi))| *lo <= *v && *v <= *hi))
    }

    /// Project onto the box.
    pub fn clip(&self, x: &DVec) -> Result<DVec> {
        check_len("space element", self.dim(), x.len())?;
        Ok(x.zip_zip_map(&self.low, &self.high, |v, lo, hi| v.clamp(lo, hi)))
    }

    /// Whether every point of `self` lies in `other`.
    pub fn is_subset_of(&self, other: &BoxSpace) -> Result<bool> {
        check_len("space", other.dim(), self.dim())?;
        Ok((0..self.dim()).all(|i| other.low[i] <= self.low[i] && self.high[i] <= other.high[i]))
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(FurutaError::ShapeMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
