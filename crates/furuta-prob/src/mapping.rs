//! Mapping between flat parameter vectors and named domain parameters.

use furuta_math::DVec;
use furuta_model::{DomainParam, DomainParams};
use serde::{Deserialize, Serialize};

use crate::error::{ProbError, Result};

/// Ordered list of domain parameters; index `i` of a flat vector maps to `params[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DomainParam>", into = "Vec<DomainParam>")]
pub struct ParamMapping {
    params: Vec<DomainParam>,
}

impl ParamMapping {
    pub fn new(params: Vec<DomainParam>) -> Result<Self> {
        if params.is_empty() {
            return Err(ProbError::EmptyMapping);
        }
        for (i, p) in params.iter().enumerate() {
            if params[..i].contains(p) {
                return Err(ProbError::DuplicateParam(*p));
            }
        }
        Ok(Self { params })
    }

    /// Build from canonical names such as `["Dr", "Dp", "Rm"]`.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = names
            .into_iter()
            .map(|n| n.as_ref().parse::<DomainParam>())
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(params)
    }

    /// Every domain parameter, dampings and motor first.
    pub fn all() -> Self {
        use DomainParam::*;
        Self {
            params: vec![Dr, Dp, Rm, Km, Mr, Mp, Lr, Lp, G],
        }
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[DomainParam] {
        &self.params
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    /// Position of `param` in the flat vector, if mapped.
    pub fn index_of(&self, param: DomainParam) -> Option<usize> {
        self.params.iter().position(|p| *p == param)
    }

    /// Pull the mapped values out of a parameter set.
    pub fn extract(&self, params: &DomainParams) -> DVec {
        DVec::from_iterator(self.len(), self.params.iter().map(|p| params.get(*p)))
    }

    fn check_len(&self, values: &[f64]) -> Result<()> {
        if values.len() == self.len() {
            Ok(())
        } else {
            Err(ProbError::DimensionMismatch {
                expected: self.len(),
                got: values.len(),
            })
        }
    }

    /// Write `values` into a copy of `base` without validating the result.
    pub(crate) fn apply_unchecked(&self, base: &DomainParams, values: &[f64]) -> DomainParams {
        self.params
            .iter()
            .zip(values)
            .fold(*base, |acc, (p, v)| acc.with(*p, *v))
    }

    /// Write `values` into a copy of `base` and validate the result.
    pub fn apply(&self, base: &DomainParams, values: &[f64]) -> Result<DomainParams> {
        self.check_len(values)?;
        let out = self.apply_unchecked(base, values);
        out.validate()?;
        Ok(out)
    }
}

impl TryFrom<Vec<DomainParam>> for ParamMapping {
    type Error = ProbError;

    fn try_from(params: Vec<DomainParam>) -> Result<Self> {
        Self::new(params)
    }
}

impl From<ParamMapping> for Vec<DomainParam> {
    fn from(mapping: ParamMapping) -> Self {
        mapping.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furuta_model::ModelError;

    #[test]
    fn test_from_names() {
        let m = ParamMapping::from_names(["Dr", "Dp", "Rm", "km"]).unwrap();
        assert_eq!(m.len(), 4);
        assert_eq!(m.names(), vec!["Dr", "Dp", "Rm", "km"]);
        assert_eq!(m.index_of(DomainParam::Rm), Some(2));
        assert_eq!(m.index_of(DomainParam::G), None);
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(matches!(
            ParamMapping::from_names(["Mp", "Lp", "Mp"]),
            Err(ProbError::DuplicateParam(DomainParam::Mp))
        ));
        assert!(matches!(
            ParamMapping::new(vec![]),
            Err(ProbError::EmptyMapping)
        ));
        assert!(matches!(
            ParamMapping::from_names(["Mq"]),
            Err(ProbError::Model(ModelError::UnknownParam(_)))
        ));
    }

    #[test]
    fn test_extract_apply() {
        let m = ParamMapping::from_names(["Mp", "Lp"]).unwrap();
        let nominal = DomainParams::nominal();
        let v = m.extract(&nominal);
        assert_eq!(v.as_slice(), &[0.024, 0.129]);

        let p = m.apply(&nominal, &[0.03, 0.14]).unwrap();
        assert_eq!(p.mp, 0.03);
        assert_eq!(p.lp, 0.14);
        assert_eq!(p.rm, nominal.rm);
    }

    #[test]
    fn test_apply_checks_length_and_validity() {
        let m = ParamMapping::from_names(["Mp", "Lp"]).unwrap();
        let nominal = DomainParams::nominal();
        assert!(matches!(
            m.apply(&nominal, &[0.03]),
            Err(ProbError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            m.apply(&nominal, &[0.03, 0.0]),
            Err(ProbError::Model(ModelError::InvalidParam { name: "Lp", .. }))
        ));
    }

    #[test]
    fn test_all_covers_every_param() {
        let m = ParamMapping::all();
        for p in DomainParam::ALL {
            assert!(m.index_of(p).is_some());
        }
    }
}
