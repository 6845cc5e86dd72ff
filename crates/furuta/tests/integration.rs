//! Integration tests for the furuta pendulum simulator.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use furuta::{
    BoxPrior, DVec, DomainParam, DomainParams, DomainRandomizer, FurutaError, IntegratorKind,
    Model, ModelBuilder, ObservationProjector, ParamMapping, QubeSim, SegmentMatcher, SimConfig,
    Simulator, State, StateVec, TaskVariant, TimePolicy, derivative,
    furuta_diff::rk4_step_jacobians,
    furuta_math::wrap_to_pi,
    furuta_real2sim::SegmentSpec,
    furuta_rigid::{mass_matrix, total_energy},
    rollout, sine,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Nominal pendulum without damping or motor coupling: a conservative system.
fn make_conservative(dt: f64) -> Model {
    ModelBuilder::new()
        .param(DomainParam::Km, 0.0)
        .param(DomainParam::Dr, 0.0)
        .param(DomainParam::Dp, 0.0)
        .dt(dt)
        .build()
        .unwrap()
}

fn end_state(model: &Model, sim: &Simulator, x0: StateVec, u: f64, h: f64, t_end: f64) -> StateVec {
    let mut model = model.clone();
    model.set_dt(h).unwrap();
    let mut state = State::new(x0);
    sim.simulate(&model, &mut state, u, (t_end / h).round() as usize)
        .unwrap();
    state.x
}

/// `|x_h - x_{h/2}| / |x_{h/2} - x_{h/4}|`
fn step_halving_ratio(sim: &Simulator, h: f64) -> f64 {
    let model = Model::nominal(h).unwrap();
    let x0 = StateVec::new(0.0, 0.5, 0.0, 0.0);
    let a = end_state(&model, sim, x0, 0.0, h, 0.2);
    let b = end_state(&model, sim, x0, 0.0, h / 2.0, 0.2);
    let c = end_state(&model, sim, x0, 0.0, h / 4.0, 0.2);
    (a - b).norm() / (b - c).norm()
}

#[test]
fn rest_is_a_fixed_point() {
    let model = Model::nominal(0.004).unwrap();
    let dx = derivative(&model, &StateVec::zeros(), 0.0).unwrap();
    assert_eq!(dx, StateVec::zeros());
}

#[test]
fn upright_is_an_equilibrium() {
    let model = Model::nominal(0.004).unwrap();
    let dx = derivative(&model, &StateVec::new(0.0, PI, 0.0, 0.0), 0.0).unwrap();
    assert_relative_eq!(dx, StateVec::zeros(), epsilon = 1e-6);
}

#[test]
fn small_oscillation_period() {
    let dt = 1e-3;
    let model = make_conservative(dt);
    let mut state = State::new(StateVec::new(0.0, 0.05, 0.0, 0.0));
    let sim = Simulator::rk4();

    // With the arm free and zero arm momentum, the pendulum sees the
    // reduced inertia M22 - M12²/M11.
    let m = mass_matrix(&model, 0.0);
    let p = model.params();
    let stiffness = 0.5 * p.mp * p.lp * p.g;
    let omega = (stiffness / (m[(1, 1)] - m[(0, 1)] * m[(0, 1)] / m[(0, 0)])).sqrt();
    let expected_period = 2.0 * PI / omega;

    let mut prev = state.x[1];
    let mut crossings = Vec::new();
    for step in 0..3000 {
        sim.step(&model, &mut state, 0.0).unwrap();
        let al = state.x[1];
        if prev > 0.0 && al <= 0.0 {
            let frac = prev / (prev - al);
            crossings.push((step as f64 + frac) * dt);
        }
        prev = al;
    }

    assert!(crossings.len() >= 3, "got {} crossings", crossings.len());
    let avg_period =
        (crossings[crossings.len() - 1] - crossings[0]) / (crossings.len() - 1) as f64;
    let relative_error = ((avg_period - expected_period) / expected_period).abs();
    assert!(
        relative_error < 0.01,
        "period error {:.4}% (measured={:.6}, expected={:.6})",
        relative_error * 100.0,
        avg_period,
        expected_period,
    );
}

#[test]
fn energy_conserved_without_losses() {
    let model = make_conservative(1e-3);
    let mut state = State::new(StateVec::new(0.0, 1.0, 2.0, 0.0));
    let sim = Simulator::rk4();
    let e0 = total_energy(&model, &state.x);

    sim.simulate(&model, &mut state, 0.0, 5000).unwrap();

    let drift = ((total_energy(&model, &state.x) - e0) / e0).abs();
    assert!(drift < 1e-4, "relative energy drift {drift:.2e}");
    assert_relative_eq!(state.time, 5.0, epsilon = 1e-9);
}

#[test]
fn rk4_is_fourth_order() {
    let ratio = step_halving_ratio(&Simulator::rk4(), 0.01);
    assert!((10.0..22.0).contains(&ratio), "ratio {ratio}");
}

#[test]
fn frozen_acceleration_variant_is_first_order() {
    let ratio = step_halving_ratio(&Simulator::frozen_acceleration_rk4(), 0.01);
    assert!((1.5..2.6).contains(&ratio), "ratio {ratio}");
}

#[test]
fn trig_observation_recovers_angles() {
    let proj = ObservationProjector::Trig;
    for k in 0..=36 {
        let a = -PI + k as f64 * PI / 18.0;
        let obs = proj.project(&StateVec::new(a, 0.5 * a, 0.0, 0.0));
        let (th, al) = proj.angles(&obs).unwrap();
        assert_relative_eq!(wrap_to_pi(th - a), 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_to_pi(al - 0.5 * a), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn stabilize_random_actions_stay_finite() {
    let env = QubeSim::new(SimConfig::new(TaskVariant::Stabilize).with_seed(11)).unwrap();
    let sim = Simulator::new();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..5 {
        let x0 = env.init_space().sample(&mut rng);
        assert!(env.init_space().contains(&x0).unwrap());
        let mut state = State::new(StateVec::from_column_slice(x0.as_slice()));
        for _ in 0..1000 {
            let u = env.act_space().sample(&mut rng)[0];
            sim.step(env.model(), &mut state, u).unwrap();
            assert!(state.is_finite());
        }
    }
}

#[test]
fn zero_pendulum_length_rejected() {
    assert!(ModelBuilder::new().param(DomainParam::Lp, 0.0).build().is_err());
    assert!(matches!(
        QubeSim::new(SimConfig::default().with_domain_param("Lp", 0.0)),
        Err(FurutaError::Model(_))
    ));

    let mut env = QubeSim::new(SimConfig::default().with_seed(0)).unwrap();
    let bad = DomainParams::nominal().with(DomainParam::Lp, 0.0);
    assert!(env.set_domain_params(bad).is_err());
    assert_eq!(env.domain_params().lp, 0.129);
}

#[test]
fn reward_is_one_at_the_goal() {
    let mut env = QubeSim::new(SimConfig::new(TaskVariant::Stabilize).with_seed(0)).unwrap();
    env.reset(Some(&DVec::from_vec(vec![0.0, PI, 0.0, 0.0])))
        .unwrap();
    let res = env.step(&DVec::zeros(1)).unwrap();
    assert_eq!(res.reward, 1.0);
    assert!(!res.done);
}

#[test]
fn init_spaces_inside_state_spaces() {
    for variant in [TaskVariant::SwingUp, TaskVariant::Stabilize] {
        let env = QubeSim::new(SimConfig::new(variant).with_seed(0)).unwrap();
        assert!(env.init_space().is_subset_of(env.state_space()).unwrap());
    }
}

#[test]
fn step_jacobians_match_dual_numbers() {
    let model = Model::nominal(0.004).unwrap();
    let mut state = State::new(StateVec::new(0.2, 2.8, -1.0, 3.0));
    let exact = rk4_step_jacobians(&model, &state.x, 1.0, model.dt()).unwrap();
    let fd = Simulator::rk4()
        .step_with_jacobians(&model, &mut state, 1.0)
        .unwrap();
    assert_relative_eq!(fd.dxnext_dx, exact.dxnext_dx, epsilon = 1e-5);
    assert_relative_eq!(fd.dxnext_du, exact.dxnext_du, epsilon = 1e-5);
    assert_eq!(state.ctrl, 1.0);
}

#[test]
fn randomized_episodes() {
    let prior = BoxPrior::around_nominal(ParamMapping::from_names(["Mp", "Lp", "Dp"]).unwrap(), 0.1)
        .unwrap();
    let mut randomizer = DomainRandomizer::nominal(prior.clone(), 3);
    let mut env =
        QubeSim::new(SimConfig::new(TaskVariant::SwingUp).with_seed(3).with_max_steps(200))
            .unwrap();

    for params in randomizer.by_ref().take(3) {
        env.set_domain_params(params).unwrap();
        let values = prior.mapping().extract(env.domain_params());
        assert!(prior.contains(values.as_slice()));
        let traj = rollout(&mut env, &mut TimePolicy::new(sine(0.5, 2.0)), None).unwrap();
        assert_eq!(traj.len(), 200);
        assert!(traj.states.iter().all(|x| x.iter().all(|v| v.is_finite())));
    }
}

#[test]
fn recorded_rollout_matches_its_own_parameters() {
    let truth = DomainParams::nominal().with(DomainParam::Mp, 0.026);
    let config = SimConfig::new(TaskVariant::SwingUp)
        .with_seed(5)
        .with_max_steps(250)
        .with_domain_param("Mp", truth.mp);
    let mut env = QubeSim::new(config).unwrap();
    let reference = rollout(&mut env, &mut TimePolicy::new(sine(1.0, 2.0)), None).unwrap();

    let matcher = SegmentMatcher::new(
        &reference,
        SegmentSpec::Count(5),
        ParamMapping::from_names(["Mp"]).unwrap(),
        DomainParams::nominal(),
    )
    .unwrap();
    assert_eq!(matcher.loss(&[0.026]).unwrap(), 0.0);
    assert!(matcher.base_loss().unwrap() > 0.0);
}

#[test]
fn config_from_json_drives_environment() {
    let config = SimConfig::from_json(
        r#"{
            "dt": 0.002,
            "max_steps": 10,
            "task": {"variant": "stabilize"},
            "integrator": "frozen_acceleration_rk4",
            "domain_params": {"Dp": 2e-6},
            "seed": 9
        }"#,
    )
    .unwrap();
    let mut env = QubeSim::new(config).unwrap();
    assert_eq!(env.domain_params().dp, 2e-6);
    assert_eq!(env.config().integrator, IntegratorKind::FrozenAccelerationRk4);

    let obs = env.reset(None).unwrap();
    assert_eq!(obs.len(), 4);
    let mut steps = 0;
    loop {
        steps += 1;
        if env.step(&DVec::zeros(1)).unwrap().done {
            break;
        }
    }
    assert_eq!(steps, 10);
}
