//! Grading of a run from its conservation errors.

use crate::conservation::ConservationMonitor;

/// Quality levels relative to an error tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SolverQuality {
    /// error < 0.01 · tolerance
    Excellent,
    /// error < 0.1 · tolerance
    Good,
    /// error < tolerance
    Marginal,
    /// error < 10 · tolerance
    Poor,
    /// everything else, including NaN
    Critical,
}

impl SolverQuality {
    pub fn assess(error: f64, tolerance: f64) -> Self {
        let ratio = error / tolerance;
        if ratio < 0.01 {
            Self::Excellent
        } else if ratio < 0.1 {
            Self::Good
        } else if ratio < 1.0 {
            Self::Marginal
        } else if ratio < 10.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }

    pub fn assess_from_monitor(monitor: &ConservationMonitor, tolerance: f64) -> Self {
        Self::assess(monitor.max_relative_error(), tolerance)
    }

    pub fn is_acceptable(self) -> bool {
        self <= Self::Marginal
    }

    /// Poor or Critical: shrink `dt` or switch to textbook RK4.
    pub fn needs_intervention(self) -> bool {
        self >= Self::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grades() {
        assert_eq!(SolverQuality::assess(1e-6, 1e-3), SolverQuality::Excellent);
        assert_eq!(SolverQuality::assess(5e-5, 1e-3), SolverQuality::Good);
        assert_eq!(SolverQuality::assess(5e-4, 1e-3), SolverQuality::Marginal);
        assert_eq!(SolverQuality::assess(5e-3, 1e-3), SolverQuality::Poor);
        assert_eq!(SolverQuality::assess(1.0, 1e-3), SolverQuality::Critical);
        assert_eq!(SolverQuality::assess(f64::NAN, 1e-3), SolverQuality::Critical);
    }

    #[test]
    fn test_acceptability() {
        assert!(SolverQuality::Marginal.is_acceptable());
        assert!(!SolverQuality::Poor.is_acceptable());
        assert!(SolverQuality::Poor.needs_intervention());
        assert!(!SolverQuality::Good.needs_intervention());
    }

    #[test]
    fn test_from_monitor() {
        let monitor = ConservationMonitor {
            energy_error: 2e-3,
            arm_momentum_error: 0.0,
        };
        assert_eq!(
            SolverQuality::assess_from_monitor(&monitor, 1e-3),
            SolverQuality::Poor
        );
    }
}
