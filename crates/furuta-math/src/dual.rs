//! Forward-mode dual numbers: `a + b·ε` with `ε² = 0`.
//!
//! Propagating a unit tangent through any [`Real`]-generic function yields
//! the exact directional derivative alongside the primal value.

use crate::Real;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Dual number carrying a primal value and one tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    /// Primal part.
    pub re: f64,
    /// Tangent (derivative) part.
    pub eps: f64,
}

impl Dual {
    /// Create a dual number.
    #[inline]
    pub fn new(re: f64, eps: f64) -> Self {
        Self { re, eps }
    }

    /// Constant (zero tangent).
    #[inline]
    pub fn constant(re: f64) -> Self {
        Self { re, eps: 0.0 }
    }

    /// Independent variable (unit tangent).
    #[inline]
    pub fn variable(re: f64) -> Self {
        Self { re, eps: 1.0 }
    }

    /// Seed a slice of values with a unit tangent at `seed_idx`.
    pub fn seeded(values: &[f64], seed_idx: usize) -> Vec<Dual> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| if i == seed_idx { Dual::variable(v) } else { Dual::constant(v) })
            .collect()
    }
}

impl Add for Dual {
    type Output = Dual;
    #[inline]
    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Dual;
    #[inline]
    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Dual;
    #[inline]
    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(self.re * rhs.re, self.re * rhs.eps + self.eps * rhs.re)
    }
}

impl Div for Dual {
    type Output = Dual;
    #[inline]
    fn div(self, rhs: Dual) -> Dual {
        let inv = 1.0 / rhs.re;
        Dual::new(
            self.re * inv,
            (self.eps * rhs.re - self.re * rhs.eps) * inv * inv,
        )
    }
}

impl Neg for Dual {
    type Output = Dual;
    #[inline]
    fn neg(self) -> Dual {
        Dual::new(-self.re, -self.eps)
    }
}

impl Real for Dual {
    #[inline]
    fn from_f64(v: f64) -> Self {
        Dual::constant(v)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.re
    }

    #[inline]
    fn sin(self) -> Self {
        Dual::new(self.re.sin(), self.eps * self.re.cos())
    }

    #[inline]
    fn cos(self) -> Self {
        Dual::new(self.re.cos(), -self.eps * self.re.sin())
    }

    #[inline]
    fn exp(self) -> Self {
        let e = self.re.exp();
        Dual::new(e, self.eps * e)
    }

    #[inline]
    fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        Dual::new(s, self.eps / (2.0 * s))
    }

    #[inline]
    fn abs(self) -> Self {
        Dual::new(self.re.abs(), self.eps * Real::signum(self.re))
    }

    #[inline]
    fn signum(self) -> Self {
        Dual::constant(Real::signum(self.re))
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Dual::constant(1.0);
        }
        Dual::new(self.re.powi(n), self.eps * n as f64 * self.re.powi(n - 1))
    }
}
