//! Conservation monitoring for a free-swinging rotary pendulum.
//!
//! Runs the conservative pendulum (no damping, no motor coupling) with both
//! integrators and reports how the energy and arm momentum drift.

use furuta_guardian::{ConservationMonitor, ConservationState, SolverQuality};
use furuta_math::StateVec;
use furuta_model::{DomainParam, ModelBuilder};
use furuta_rigid::{IntegratorKind, total_energy};
use tracing::{info, warn};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .compact()
        .init();

    let model = ModelBuilder::new()
        .param(DomainParam::Dr, 0.0)
        .param(DomainParam::Dp, 0.0)
        .param(DomainParam::Km, 0.0)
        .dt(0.004)
        .build()
        .expect("conservative parameters are valid");

    let x0 = StateVec::new(0.0, 2.0, 1.0, -1.5);
    let baseline = ConservationState::new(&model, &x0);
    info!(
        energy = baseline.baseline_energy,
        arm_momentum = baseline.baseline_arm_momentum,
        "initial conditions"
    );

    let total_steps = 25_000; // 100 seconds
    for kind in [IntegratorKind::Rk4, IntegratorKind::FrozenAccelerationRk4] {
        let mut x = x0;
        let mut warnings = 0;

        for step in 0..total_steps {
            x = match kind.integrate(&model, &x, 0.0, model.dt()) {
                Ok(next) => next,
                Err(err) => {
                    warn!(?kind, step, %err, "integration failed");
                    break;
                }
            };

            if step % 2500 == 0 {
                let monitor = ConservationMonitor::check(&baseline, &model, &x);
                let quality = SolverQuality::assess_from_monitor(&monitor, 1e-3);
                if !quality.is_acceptable() {
                    warnings += 1;
                }
                info!(
                    ?kind,
                    time = step as f64 * model.dt(),
                    energy = total_energy(&model, &x),
                    energy_error = monitor.energy_error,
                    ?quality,
                    "checkpoint"
                );
                if quality.needs_intervention() {
                    warn!("quality degraded: reduce dt or switch to textbook RK4");
                }
            }
        }

        let final_monitor = ConservationMonitor::check(&baseline, &model, &x);
        info!(
            ?kind,
            energy_error = final_monitor.energy_error,
            arm_momentum_error = final_monitor.arm_momentum_error,
            warnings,
            "summary"
        );
    }
}
