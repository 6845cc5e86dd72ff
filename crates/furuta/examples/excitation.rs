//! Excite the simulated Qube with a sine or a chirp and export the rollout.
//!
//! Usage: `cargo run --example excitation -- [sin|chirp] [out.json]`

use furuta::{
    DVec, DomainParams, FrameSink, QubeSim, SimConfig, State, TaskVariant, TimePolicy,
    linear_chirp, rollout, sine,
};
use tracing::info;

/// Logs every `every`-th frame.
struct LogSink {
    every: usize,
    count: usize,
}

impl FrameSink for LogSink {
    fn push_frame(&mut self, state: &State, _params: &DomainParams) {
        if self.count % self.every == 0 {
            info!(
                t = state.time,
                theta = state.theta(),
                alpha = state.alpha(),
                u = state.ctrl,
                "frame"
            );
        }
        self.count += 1;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_target(false)
        .compact()
        .init();

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "sin".into());
    let out = args.next();

    let config = SimConfig::new(TaskVariant::SwingUp)
        .with_seed(0)
        .with_max_steps(1000);
    let t_end = config.max_steps as f64 * config.dt;
    let mut env = QubeSim::new(config).expect("default configuration is valid");
    env.attach_sink(Box::new(LogSink { every: 250, count: 0 }));

    let zero = DVec::zeros(4);
    let traj = match mode.as_str() {
        "chirp" => {
            let mut policy = TimePolicy::new(linear_chirp(1.0, 5.0, 0.0, t_end));
            rollout(&mut env, &mut policy, Some(&zero))
        }
        _ => rollout(&mut env, &mut TimePolicy::new(sine(1.0, 2.0)), Some(&zero)),
    }
    .expect("rollout failed");

    let last = traj.final_state().copied().unwrap_or_default();
    info!(
        mode = %mode,
        steps = traj.len(),
        total_reward = traj.total_reward(),
        theta = last[0],
        alpha = last[1],
        "excitation finished"
    );

    if let Some(path) = out {
        let json = traj.to_json_pretty().expect("trajectory serializes");
        std::fs::write(&path, json).expect("cannot write output file");
        info!(path = %path, "trajectory written");
    }
}
