use crate::SimError;
use crate::metrics::Metric;
use crate::queue::{BacklogProbe, DropTailBuffer, QueueModel, QueueParams};
use crate::rv::Sampler;
use crate::sim::{EventKind, EventScheduler, SimTime};

#[test]
fn droptail_buffer_enforces_capacity_and_preserves_order() {
    let mut q = DropTailBuffer::new(Some(2));
    assert_eq!(q.capacity(), Some(2));
    assert!(q.is_empty());

    assert!(q.enqueue(SimTime(1.0)).is_ok());
    assert!(q.enqueue(SimTime(2.0)).is_ok());
    assert!(q.is_full());
    assert_eq!(q.enqueue(SimTime(3.0)), Err(SimTime(3.0)));
    assert_eq!(q.len(), 2);

    assert_eq!(q.dequeue(), Some(SimTime(1.0)));
    assert_eq!(q.dequeue(), Some(SimTime(2.0)));
    assert_eq!(q.dequeue(), None);
}

#[test]
fn unbounded_buffer_never_fills() {
    let mut q = DropTailBuffer::unbounded();
    for i in 0..10_000 {
        assert!(q.enqueue(SimTime(i as f64)).is_ok());
    }
    assert!(!q.is_full());
    assert_eq!(q.len(), 10_000);
}

#[test]
fn queue_params_derive_rates_and_probe() {
    let p = QueueParams::mm1(0.5);
    // λ = C·ρ / L = 1e6 · 0.5 / 2000
    assert_eq!(p.arrival_rate(), 250.0);
    assert_eq!(p.observation_rate(), 1_250.0);
    assert_eq!(p.probe(), BacklogProbe::ArrivalsMinusDepartures);
    assert_eq!(QueueParams::mm1k(0.5, 10).probe(), BacklogProbe::Occupancy);
    assert_eq!(p.label(), "rho=0.50 K=inf");
    assert_eq!(QueueParams::mm1k(1.5, 10).label(), "rho=1.50 K=10");
}

#[test]
fn invalid_queue_configuration_fails_before_running() {
    assert!(matches!(
        QueueModel::new(QueueParams::mm1k(0.5, 0)),
        Err(SimError::InvalidConfig(_))
    ));
    assert!(matches!(
        QueueModel::new(QueueParams::mm1(0.0)),
        Err(SimError::InvalidRate { .. })
    ));
    assert!(QueueModel::new(QueueParams::mm1(-0.3)).is_err());

    let mut sampler = Sampler::seeded(1);
    assert!(QueueModel::simulate(QueueParams::mm1(0.5), SimTime::ZERO, &mut sampler).is_err());
}

fn hand_built_events() -> EventScheduler {
    // two simultaneous arrivals at t=1, observations before and at t=1
    EventScheduler::from_streams([
        (EventKind::Arrival, vec![SimTime(1.0), SimTime(1.0)]),
        (EventKind::Observation, vec![SimTime(0.5), SimTime(1.0)]),
    ])
}

#[test]
fn finite_buffer_drops_arrival_when_full_and_samples_occupancy() {
    let mut model = QueueModel::new(QueueParams::mm1k(0.5, 1)).expect("model");
    let mut sampler = Sampler::seeded(3);
    let mut sched = hand_built_events();
    model.process(&mut sched, &mut sampler).expect("run");

    let c = *model.counters();
    assert_eq!(c.arrivals, 2);
    assert_eq!(c.dropped_arrivals, 1);
    assert_eq!(c.departures, 1);
    assert_eq!(c.observations, 2);
    assert_eq!(c.idle_observations, 1);
    assert_eq!(model.occupancy(), 0);
    assert!(model.service_watermark() > SimTime(1.0));

    let r = model.finish();
    assert_eq!(r.get(Metric::IdleProbability), Some(0.5));
    assert_eq!(r.get(Metric::AvgQueueLength), Some(0.5));
    assert_eq!(r.get(Metric::DropProbability), Some(0.5));
}

#[test]
fn infinite_buffer_samples_arrivals_minus_departures() {
    let mut model = QueueModel::new(QueueParams::mm1(0.5)).expect("model");
    let mut sampler = Sampler::seeded(3);
    let mut sched = hand_built_events();
    model.process(&mut sched, &mut sampler).expect("run");

    let c = *model.counters();
    assert_eq!(c.arrivals, 2);
    assert_eq!(c.dropped_arrivals, 0);
    assert_eq!(c.departures, 2);

    let r = model.finish();
    // backlog 0 at t=0.5, 2 at t=1
    assert_eq!(r.get(Metric::AvgQueueLength), Some(1.0));
    assert_eq!(r.get(Metric::IdleProbability), Some(0.5));
    assert_eq!(r.get(Metric::DropProbability), None);
}

#[test]
fn second_job_waits_for_the_service_watermark() {
    let mut model = QueueModel::new(QueueParams::mm1(0.5)).expect("model");
    let mut sampler = Sampler::seeded(5);
    let mut sched = EventScheduler::from_streams([(
        EventKind::Arrival,
        vec![SimTime(1.0), SimTime(1.0)],
    )]);

    let mut departures = Vec::new();
    while let Some(ev) = sched.pop() {
        if ev.kind == EventKind::Departure {
            departures.push(ev.at);
        }
        model.step(ev, &mut sched, &mut sampler).expect("step");
    }
    assert_eq!(departures.len(), 2);
    assert!(departures[0] >= SimTime(1.0));
    assert!(departures[1] >= departures[0]);
    assert_eq!(model.service_watermark(), departures[1]);
}

#[test]
fn degenerate_run_reports_no_metrics() {
    let mut model = QueueModel::new(QueueParams::mm1k(0.5, 5)).expect("model");
    let mut sampler = Sampler::seeded(1);
    let mut sched = EventScheduler::new();
    model.process(&mut sched, &mut sampler).expect("run");
    assert!(model.finish().is_empty());
}

#[test]
fn occupancy_and_counters_stay_consistent_throughout_a_saturated_run() {
    let cap = 5;
    let mut model = QueueModel::new(QueueParams::mm1k(1.2, cap)).expect("model");
    let mut sampler = Sampler::seeded(8);
    let mut sched = model.schedule(SimTime(5.0), &mut sampler).expect("events");

    let mut last_at = SimTime::ZERO;
    while let Some(ev) = sched.pop() {
        assert!(ev.at >= last_at, "events popped out of order");
        last_at = ev.at;
        model.step(ev, &mut sched, &mut sampler).expect("step");

        let c = model.counters();
        assert!(model.occupancy() <= cap);
        assert!(c.departures <= c.arrivals);
        assert!(c.idle_observations <= c.observations);
        assert!(c.dropped_arrivals <= c.arrivals);
    }
    assert_eq!(model.occupancy(), 0);
    // 每个到达恰好被服务或被丢弃一次
    let c = model.counters();
    assert!(c.dropped_arrivals > 0);
    assert_eq!(c.arrivals, c.departures + c.dropped_arrivals);

    let r = model.finish();
    let drop = r.get(Metric::DropProbability).expect("drop");
    let idle = r.get(Metric::IdleProbability).expect("idle");
    assert!((0.0..=1.0).contains(&drop));
    assert!((0.0..=1.0).contains(&idle));
}

#[test]
fn replaying_with_the_same_seed_gives_identical_metrics() {
    let run = |seed| {
        let mut sampler = Sampler::seeded(seed);
        QueueModel::simulate(QueueParams::mm1k(0.9, 10), SimTime(20.0), &mut sampler)
            .expect("run")
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn mm1_idle_probability_approaches_one_minus_rho() {
    let mut sampler = Sampler::seeded(2024);
    let r = QueueModel::simulate(QueueParams::mm1(0.5), SimTime(200.0), &mut sampler)
        .expect("run");

    let idle = r.get(Metric::IdleProbability).expect("idle");
    let avg = r.get(Metric::AvgQueueLength).expect("avg");
    assert!((idle - 0.5).abs() < 0.05, "idle={idle}");
    // E[N] = ρ / (1 - ρ) = 1
    assert!((avg - 1.0).abs() < 0.2, "avg={avg}");
}

#[test]
fn overloaded_finite_queue_drops_a_material_share() {
    let mut sampler = Sampler::seeded(77);
    let r = QueueModel::simulate(QueueParams::mm1k(1.5, 10), SimTime(50.0), &mut sampler)
        .expect("run");

    let drop = r.get(Metric::DropProbability).expect("drop");
    let avg = r.get(Metric::AvgQueueLength).expect("avg");
    assert!(drop > 0.2, "drop={drop}");
    assert!(avg <= 10.0);
}
