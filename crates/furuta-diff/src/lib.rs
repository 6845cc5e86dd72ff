//! Differentiation utilities for furuta: Jacobians of the pendulum dynamics.
//!
//! Provides finite-difference derivatives of any [`Solver`] step and exact
//! derivatives through forward-mode dual numbers, both of the continuous
//! dynamics (`A = ∂f/∂x`, `B = ∂f/∂u`) and of one textbook RK4 step.

use furuta_math::{Dual, Mat4, Real, StateVec, state_from_array, state_to_array};
use furuta_model::{DerivedConstants, DomainParams, Model};
use furuta_rigid::{Result, Solver, derivative, derivative_with};

/// Jacobians of a single simulation step `x' = Φ(x, u)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepJacobians {
    /// ∂x'/∂x
    pub dxnext_dx: Mat4,
    /// ∂x'/∂u
    pub dxnext_du: StateVec,
}

/// Continuous-time linearization `ẋ ≈ A·δx + B·δu` around `(x, u)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Linearization {
    pub a: Mat4,
    pub b: StateVec,
}

/// Step Jacobians of an arbitrary solver via central differences.
pub fn finite_diff_step_jacobians(
    model: &Model,
    solver: &dyn Solver,
    x: &StateVec,
    u: f64,
    h: f64,
    eps: f64,
) -> Result<StepJacobians> {
    let inv_2eps = 1.0 / (2.0 * eps);
    let mut dxnext_dx = Mat4::zeros();

    for j in 0..4 {
        let mut xp = *x;
        xp[j] += eps;
        let mut xm = *x;
        xm[j] -= eps;
        let col = (solver.integrate(model, &xp, u, h)? - solver.integrate(model, &xm, u, h)?)
            * inv_2eps;
        dxnext_dx.set_column(j, &col);
    }

    let dxnext_du =
        (solver.integrate(model, x, u + eps, h)? - solver.integrate(model, x, u - eps, h)?)
            * inv_2eps;

    Ok(StepJacobians {
        dxnext_dx,
        dxnext_du,
    })
}

/// Continuous-time Jacobians via central differences on the derivative.
pub fn finite_diff_linearization(
    model: &Model,
    x: &StateVec,
    u: f64,
    eps: f64,
) -> Result<Linearization> {
    let inv_2eps = 1.0 / (2.0 * eps);
    let mut a = Mat4::zeros();

    for j in 0..4 {
        let mut xp = *x;
        xp[j] += eps;
        let mut xm = *x;
        xm[j] -= eps;
        a.set_column(j, &((derivative(model, &xp, u)? - derivative(model, &xm, u)?) * inv_2eps));
    }

    let b = (derivative(model, x, u + eps)? - derivative(model, x, u - eps)?) * inv_2eps;
    Ok(Linearization { a, b })
}

/// Seed direction `j` (0..4 state, 4 action) and return dual inputs.
fn seeded_inputs(x: &StateVec, u: f64, j: usize) -> ([Dual; 4], Dual) {
    let mut inputs = state_to_array(x).to_vec();
    inputs.push(u);
    let d = Dual::seeded(&inputs, j);
    ([d[0], d[1], d[2], d[3]], d[4])
}

/// Evaluate `f` once per input direction and assemble `(∂/∂x, ∂/∂u)`.
fn forward_jacobians<F>(x: &StateVec, u: f64, f: F) -> Result<(Mat4, StateVec)>
where
    F: Fn([Dual; 4], Dual) -> Result<[Dual; 4]>,
{
    let mut dx = Mat4::zeros();
    let mut du = StateVec::zeros();
    for j in 0..5 {
        let (xd, ud) = seeded_inputs(x, u, j);
        let out = f(xd, ud)?;
        let col = state_from_array(out.map(|d| d.eps));
        if j < 4 {
            dx.set_column(j, &col);
        } else {
            du = col;
        }
    }
    Ok((dx, du))
}

/// Exact continuous-time Jacobians `A = ∂f/∂x`, `B = ∂f/∂u` by forward-mode AD.
pub fn linearize(model: &Model, x: &StateVec, u: f64) -> Result<Linearization> {
    let (p, c) = (model.params(), model.constants());
    let (a, b) = forward_jacobians(x, u, |xd, ud| derivative_with(p, c, xd, ud))?;
    Ok(Linearization { a, b })
}

/// One textbook RK4 step, generic over the scalar.
pub fn rk4_step_with<T: Real>(
    p: &DomainParams,
    c: &DerivedConstants,
    x: [T; 4],
    u: T,
    h: f64,
) -> Result<[T; 4]> {
    let axpy = |a: [T; 4], k: [T; 4], s: f64| {
        let s = T::from_f64(s);
        [a[0] + k[0] * s, a[1] + k[1] * s, a[2] + k[2] * s, a[3] + k[3] * s]
    };

    let k1 = derivative_with(p, c, x, u)?;
    let k2 = derivative_with(p, c, axpy(x, k1, h / 2.0), u)?;
    let k3 = derivative_with(p, c, axpy(x, k2, h / 2.0), u)?;
    let k4 = derivative_with(p, c, axpy(x, k3, h), u)?;

    let two = T::from_f64(2.0);
    let sixth = T::from_f64(h / 6.0);
    Ok(std::array::from_fn(|i| {
        x[i] + (k1[i] + two * k2[i] + two * k3[i] + k4[i]) * sixth
    }))
}

/// Exact Jacobians of one textbook RK4 step by forward-mode AD.
pub fn rk4_step_jacobians(model: &Model, x: &StateVec, u: f64, h: f64) -> Result<StepJacobians> {
    let (p, c) = (model.params(), model.constants());
    let (dxnext_dx, dxnext_du) = forward_jacobians(x, u, |xd, ud| rk4_step_with(p, c, xd, ud, h))?;
    Ok(StepJacobians {
        dxnext_dx,
        dxnext_du,
    })
}
