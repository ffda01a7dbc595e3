use crate::SimError;
use crate::convergence::{
    ConvergenceController, ConvergenceSettings, max_relative_error, relative_error,
};
use crate::csma::CsmaParams;
use crate::metrics::{Metric, RunResult};
use crate::queue::QueueParams;
use crate::scenario::Scenario;
use crate::sim::SimTime;

fn result(pairs: &[(Metric, f64)]) -> RunResult {
    let mut r = RunResult::new();
    for (m, v) in pairs {
        r.set(*m, Some(*v));
    }
    r
}

/// Slow line so a few thousand arrivals cover a long horizon.
fn slow_mm1(rho: f64) -> Scenario {
    let mut p = QueueParams::mm1(rho);
    p.line_rate_bps = 10_000.0;
    Scenario::Queue(p)
}

fn settings(start: f64, threshold: f64, max_rounds: u32, seed: u64) -> ConvergenceSettings {
    ConvergenceSettings {
        start_horizon: SimTime(start),
        threshold,
        max_rounds,
        seed: Some(seed),
        ..ConvergenceSettings::default()
    }
}

#[test]
fn relative_error_cases() {
    assert_eq!(relative_error(0.5, 0.5), 0.0);
    assert_eq!(relative_error(0.0, 0.0), 1.0);
    assert_eq!(relative_error(0.3, 0.0), 0.0);
    assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-12);
    assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-12);
}

#[test]
fn max_relative_error_skips_undefined_and_all_zero_metrics() {
    let prev = result(&[
        (Metric::AvgQueueLength, 2.0),
        (Metric::DropProbability, 0.0),
        (Metric::IdleProbability, 0.4),
    ]);
    let cur = result(&[
        (Metric::AvgQueueLength, 2.2),
        (Metric::DropProbability, 0.0),
    ]);
    let e = max_relative_error(&cur, &prev).expect("comparable");
    assert!((e - 0.1).abs() < 1e-12, "e={e}");

    let only_zero = result(&[(Metric::DropProbability, 0.0)]);
    assert_eq!(max_relative_error(&only_zero, &only_zero), None);
    assert_eq!(max_relative_error(&RunResult::new(), &prev), None);
}

#[test]
fn metric_leaving_a_zero_baseline_does_not_block_convergence() {
    // first drop in a large buffer: 0 -> 1e-7
    let prev = result(&[
        (Metric::AvgQueueLength, 1.0),
        (Metric::DropProbability, 0.0),
    ]);
    let cur = result(&[
        (Metric::AvgQueueLength, 1.01),
        (Metric::DropProbability, 1e-7),
    ]);
    let e = max_relative_error(&cur, &prev).expect("comparable");
    assert!((e - 0.01).abs() < 1e-12, "e={e}");

    let only_drop_prev = result(&[(Metric::DropProbability, 0.0)]);
    let only_drop_cur = result(&[(Metric::DropProbability, 1e-7)]);
    assert_eq!(max_relative_error(&only_drop_cur, &only_drop_prev), Some(0.0));
}

#[test]
fn controller_rejects_invalid_setup_before_running() {
    let ok = settings(10.0, 0.05, 4, 1);
    assert!(matches!(
        ConvergenceController::new(vec![], ok.clone()),
        Err(SimError::InvalidConfig(_))
    ));
    assert!(ConvergenceController::new(vec![slow_mm1(0.5)], settings(10.0, 0.05, 1, 1)).is_err());
    assert!(ConvergenceController::new(vec![slow_mm1(0.5)], settings(0.0, 0.05, 4, 1)).is_err());
    assert!(ConvergenceController::new(vec![slow_mm1(0.5)], settings(10.0, 0.0, 4, 1)).is_err());
    assert!(
        ConvergenceController::new(vec![Scenario::Queue(QueueParams::mm1k(0.5, 0))], ok.clone())
            .is_err()
    );
    assert!(
        ConvergenceController::new(vec![Scenario::Csma(CsmaParams::new(0, 12.0, true))], ok)
            .is_err()
    );
}

#[test]
fn first_round_is_baseline_and_horizon_doubles() {
    let ctl = ConvergenceController::new(
        vec![slow_mm1(0.5), slow_mm1(0.7)],
        settings(500.0, 1e-12, 3, 4),
    )
    .expect("controller");
    let outcome = ctl.run().expect("run");

    assert!(!outcome.converged);
    assert_eq!(outcome.rounds.len(), 3);
    let first = &outcome.rounds[0];
    assert_eq!(first.max_error, None);
    assert!(first.configs.iter().all(|c| c.error.is_none()));

    let horizons: Vec<f64> = outcome.rounds.iter().map(|r| r.horizon).collect();
    assert_eq!(horizons, vec![500.0, 1_000.0, 2_000.0]);
    assert_eq!(outcome.final_horizon(), Some(2_000.0));
    for r in &outcome.rounds[1..] {
        assert!(r.max_error.is_some());
        assert_eq!(r.configs.len(), 2);
        assert_eq!(r.configs[0].label, "rho=0.50 K=inf");
        assert_eq!(r.configs[1].label, "rho=0.70 K=inf");
    }
}

#[test]
fn loose_threshold_converges_on_second_round() {
    let ctl = ConvergenceController::new(vec![slow_mm1(0.5)], settings(500.0, 10.0, 6, 8))
        .expect("controller");
    let outcome = ctl.run().expect("run");
    assert!(outcome.converged);
    assert_eq!(outcome.rounds.len(), 2);
}

#[test]
fn stable_queue_converges_within_round_ceiling() {
    let ctl = ConvergenceController::new(
        vec![slow_mm1(0.3), slow_mm1(0.5)],
        settings(2_000.0, 0.1, 8, 21),
    )
    .expect("controller");

    let mut observed = Vec::new();
    let outcome = ctl
        .run_with(|r| observed.push(r.round))
        .expect("run");

    assert!(outcome.converged);
    assert!(outcome.rounds.len() >= 2);
    let last = outcome.last().expect("rounds");
    assert!(last.max_error.expect("compared") <= 0.1);
    let expected: Vec<u32> = (0..outcome.rounds.len() as u32).collect();
    assert_eq!(observed, expected);
}

#[test]
fn seeded_study_is_reproducible_regardless_of_worker_scheduling() {
    let scenarios = vec![
        slow_mm1(0.4),
        Scenario::Queue(QueueParams::mm1k(1.2, 10)),
        Scenario::Csma(CsmaParams::new(6, 10.0, true)),
    ];
    let run = || {
        ConvergenceController::new(scenarios.clone(), settings(2.0, 1e-12, 2, 77))
            .expect("controller")
            .run()
            .expect("run")
    };
    let a = run();
    let b = run();
    for (ra, rb) in a.rounds.iter().zip(&b.rounds) {
        for (ca, cb) in ra.configs.iter().zip(&rb.configs) {
            assert_eq!(ca.result, cb.result);
        }
    }
}

#[test]
fn doubling_stops_before_a_round_exceeds_the_event_budget() {
    // slow_mm1(0.5): λ = 2.5/s, α = 12.5/s, about 17.5 events per second
    let mut s = settings(100.0, 1e-12, 12, 3);
    s.max_events_per_run = 5_000.0;
    let outcome = ConvergenceController::new(vec![slow_mm1(0.5)], s.clone())
        .expect("controller")
        .run()
        .expect("run");

    assert!(!outcome.converged);
    let horizons: Vec<f64> = outcome.rounds.iter().map(|r| r.horizon).collect();
    assert_eq!(horizons, vec![100.0, 200.0]);

    s.start_horizon = SimTime(1_000.0);
    assert!(matches!(
        ConvergenceController::new(vec![slow_mm1(0.5)], s.clone()),
        Err(SimError::InvalidConfig(_))
    ));
    s.max_events_per_run = 0.0;
    assert!(s.validate().is_err());
}

#[test]
fn preset_studies_fit_the_default_event_budget_at_the_start_horizon() {
    use crate::study::StudySpec;
    for spec in [StudySpec::mm1(), StudySpec::mm1k(), StudySpec::csma(true)] {
        let scenarios = spec.scenarios().expect("scenarios");
        assert!(ConvergenceController::new(scenarios, spec.settings()).is_ok());
    }
}

#[test]
fn default_settings_match_study_constants() {
    let d = ConvergenceSettings::default();
    assert_eq!(d.start_horizon, SimTime(1_000.0));
    assert_eq!(d.threshold, 0.05);
    assert!(d.max_rounds >= 2);
    assert_eq!(d.seed, None);
    assert!(d.validate().is_ok());
}
