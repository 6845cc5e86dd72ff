//! Identify pendulum parameters from a recorded rollout.
//!
//! Records a rollout under "true" parameters, then recovers them with Adam
//! by matching segments of the recording, starting from nominal values.

use furuta::furuta_real2sim::{AdamOptimizer, Optimizer, OptimizerConfig, SegmentSpec};
use furuta::{
    BoxPrior, DomainParams, DVec, ParamMapping, QubeSim, SegmentMatcher, SimConfig, TaskVariant,
    TimePolicy, rollout, sine,
};
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .compact()
        .init();

    let config = SimConfig::new(TaskVariant::SwingUp)
        .with_seed(1)
        .with_max_steps(500)
        .with_domain_param("Mp", 0.026)
        .with_domain_param("Lp", 0.124);
    let truth = config.initial_domain_params().expect("valid overrides");
    let mut env = QubeSim::new(config).expect("valid configuration");
    let zero = DVec::zeros(4);
    let reference = rollout(&mut env, &mut TimePolicy::new(sine(1.0, 2.0)), Some(&zero))
        .expect("reference rollout");

    let mapping = ParamMapping::from_names(["Mp", "Lp"]).expect("known parameter names");
    let prior = BoxPrior::around_nominal(mapping.clone(), 0.15).expect("valid prior");
    let matcher = SegmentMatcher::new(
        &reference,
        SegmentSpec::Length(100),
        mapping.clone(),
        DomainParams::nominal(),
    )
    .expect("matcher construction");

    let optimizer = AdamOptimizer::with_config(OptimizerConfig {
        max_iterations: 300,
        learning_rate: 0.02,
        log_every: 50,
        ..OptimizerConfig::default()
    });
    let init = mapping.extract(&DomainParams::nominal());
    let result = optimizer
        .optimize(&matcher, &prior, &init)
        .expect("optimization");

    for (name, value) in mapping.names().into_iter().zip(result.values.iter()) {
        let true_value = truth.get_by_name(name).expect("mapped names are known");
        info!(param = name, estimate = *value, truth = true_value, "identified");
    }
    info!(final_loss = result.final_loss, iterations = result.iterations, "done");
}
