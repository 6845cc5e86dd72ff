//! Optimization algorithms for parameter estimation.
//!
//! Both optimizers work in the unit box `z ∈ [0, 1]^n` obtained by
//! normalising the mapped parameters with the prior bounds, so parameters
//! of very different magnitude (damping ~1e-6, resistance ~10) share one
//! learning rate. Every iterate is projected back onto the box.

use furuta_math::DVec;
use furuta_model::DomainParams;
use furuta_prob::{BoxPrior, ProbError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Real2SimError, Result};
use crate::matcher::SegmentMatcher;

/// Configuration for optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Learning rate in normalised coordinates.
    pub learning_rate: f64,
    /// Stop when the loss changes by less than this between iterations.
    pub convergence_threshold: f64,
    /// Finite-difference step in normalised coordinates.
    pub gradient_epsilon: f64,
    /// Log progress every N iterations.
    pub log_every: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            learning_rate: 0.01,
            convergence_threshold: 1e-12,
            gradient_epsilon: 1e-4,
            log_every: 10,
        }
    }
}

/// Trait for optimization algorithms.
pub trait Optimizer {
    /// Minimise the matcher's loss over the prior box, starting from `init`
    /// (mapped parameter values, projected onto the box first).
    fn optimize(
        &self,
        matcher: &SegmentMatcher,
        prior: &BoxPrior,
        init: &DVec,
    ) -> Result<OptimizationResult>;
}

/// Result of optimization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best mapped parameter values.
    pub values: DVec,
    /// Full parameter set for `values`.
    pub params: DomainParams,
    pub final_loss: f64,
    pub iterations: usize,
    pub converged: bool,
    pub loss_history: Vec<f64>,
}

/// Prior box as an affine map to and from `[0, 1]^n`.
struct UnitBox<'a> {
    prior: &'a BoxPrior,
}

impl UnitBox<'_> {
    fn width(&self, i: usize) -> f64 {
        self.prior.high()[i] - self.prior.low()[i]
    }

    fn to_unit(&self, values: &DVec) -> DVec {
        DVec::from_iterator(
            values.len(),
            values.iter().enumerate().map(|(i, v)| {
                let w = self.width(i);
                if w > 0.0 { ((v - self.prior.low()[i]) / w).clamp(0.0, 1.0) } else { 0.0 }
            }),
        )
    }

    fn from_unit(&self, z: &DVec) -> DVec {
        DVec::from_iterator(
            z.len(),
            z.iter()
                .enumerate()
                .map(|(i, zi)| self.prior.low()[i] + zi.clamp(0.0, 1.0) * self.width(i)),
        )
    }

    fn loss(&self, matcher: &SegmentMatcher, z: &DVec) -> Result<f64> {
        matcher.loss(self.from_unit(z).as_slice())
    }

    /// Central differences in unit coordinates, one-sided at the faces.
    fn gradient(&self, matcher: &SegmentMatcher, z: &DVec, eps: f64) -> Result<DVec> {
        let mut grad = DVec::zeros(z.len());
        for i in 0..z.len() {
            let mut plus = z.clone();
            plus[i] = (z[i] + eps).min(1.0);
            let mut minus = z.clone();
            minus[i] = (z[i] - eps).max(0.0);
            let span = plus[i] - minus[i];
            if span > 0.0 {
                grad[i] = (self.loss(matcher, &plus)? - self.loss(matcher, &minus)?) / span;
            }
        }
        Ok(grad)
    }
}

fn check_dims(matcher: &SegmentMatcher, prior: &BoxPrior, init: &DVec) -> Result<()> {
    if prior.mapping() != matcher.mapping() {
        return Err(Real2SimError::Prob(ProbError::DimensionMismatch {
            expected: matcher.mapping().len(),
            got: prior.dim(),
        }));
    }
    if init.len() != prior.dim() {
        return Err(Real2SimError::Prob(ProbError::DimensionMismatch {
            expected: prior.dim(),
            got: init.len(),
        }));
    }
    Ok(())
}

/// Shared iteration loop; `update` turns a gradient into a step in unit coordinates.
fn run<F>(
    name: &str,
    config: &OptimizerConfig,
    matcher: &SegmentMatcher,
    prior: &BoxPrior,
    init: &DVec,
    mut update: F,
) -> Result<OptimizationResult>
where
    F: FnMut(usize, &DVec) -> DVec,
{
    check_dims(matcher, prior, init)?;
    let unit = UnitBox { prior };
    let mut z = unit.to_unit(init);
    let mut loss_history = Vec::new();
    let mut prev_loss = f64::INFINITY;

    let finish = |z: &DVec,
                  final_loss: f64,
                  iterations: usize,
                  converged: bool,
                  loss_history: Vec<f64>|
     -> Result<OptimizationResult> {
        let values = unit.from_unit(z);
        let params = matcher.params_for(values.as_slice())?;
        info!(optimizer = name, iterations, final_loss, converged, "optimization finished");
        Ok(OptimizationResult {
            values,
            params,
            final_loss,
            iterations,
            converged,
            loss_history,
        })
    };

    for iter in 0..config.max_iterations {
        let loss = unit.loss(matcher, &z)?;
        if !loss.is_finite() {
            warn!(optimizer = name, iter, "non-finite loss, stopping");
            return finish(&z, loss, iter + 1, false, loss_history);
        }
        loss_history.push(loss);

        if (prev_loss - loss).abs() < config.convergence_threshold {
            return finish(&z, loss, iter + 1, true, loss_history);
        }

        if config.log_every > 0 && iter % config.log_every == 0 {
            info!(optimizer = name, iter, loss, "optimizer progress");
        }

        let grad = unit.gradient(matcher, &z, config.gradient_epsilon)?;
        let step = update(iter, &grad);
        let proposed = &z - step;
        z = proposed.map(|v| v.clamp(0.0, 1.0));
        if z != proposed {
            debug!(optimizer = name, iter, "step projected onto prior box");
        }

        prev_loss = loss;
    }

    let final_loss = unit.loss(matcher, &z)?;
    finish(&z, final_loss, config.max_iterations, false, loss_history)
}

/// Gradient descent optimizer.
pub struct GradientDescentOptimizer {
    pub config: OptimizerConfig,
}

impl GradientDescentOptimizer {
    pub fn new() -> Self {
        Self {
            config: OptimizerConfig::default(),
        }
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }
}

impl Default for GradientDescentOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for GradientDescentOptimizer {
    fn optimize(
        &self,
        matcher: &SegmentMatcher,
        prior: &BoxPrior,
        init: &DVec,
    ) -> Result<OptimizationResult> {
        let lr = self.config.learning_rate;
        run("gd", &self.config, matcher, prior, init, |_, grad| grad * lr)
    }
}

/// Adam optimizer (adaptive moment estimation).
pub struct AdamOptimizer {
    pub config: OptimizerConfig,
    /// Decay rate of the first moment.
    pub beta1: f64,
    /// Decay rate of the second moment.
    pub beta2: f64,
    /// Added to the denominator for numerical stability.
    pub epsilon: f64,
}

impl AdamOptimizer {
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self {
            config,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

impl Default for AdamOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for AdamOptimizer {
    fn optimize(
        &self,
        matcher: &SegmentMatcher,
        prior: &BoxPrior,
        init: &DVec,
    ) -> Result<OptimizationResult> {
        let n = prior.dim();
        let mut m = DVec::zeros(n);
        let mut v = DVec::zeros(n);
        let (b1, b2, eps, lr) = (
            self.beta1,
            self.beta2,
            self.epsilon,
            self.config.learning_rate,
        );

        run("adam", &self.config, matcher, prior, init, |iter, grad| {
            m = &m * b1 + grad * (1.0 - b1);
            v = &v * b2 + grad.component_mul(grad) * (1.0 - b2);

            let t = (iter + 1) as i32;
            let m_hat = &m / (1.0 - b1.powi(t));
            let v_hat = &v / (1.0 - b2.powi(t));
            m_hat.zip_map(&v_hat, |mh, vh| lr * mh / (vh.sqrt() + eps))
        })
    }
}
