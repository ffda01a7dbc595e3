//! Study definitions.
//!
//! A study is a sweep of configuration points plus the convergence settings
//! used to drive it. The built-in presets carry the constants of the classic
//! M/M/1, M/M/1/K and CSMA/CD experiments; a JSON study file can override
//! any of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::convergence::ConvergenceSettings;
use crate::csma::CsmaParams;
use crate::error::{Result, SimError};
use crate::queue::QueueParams;
use crate::scenario::Scenario;
use crate::sim::SimTime;

/// Inclusive arithmetic sweep `start, start + step, ..., <= stop`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sweep {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Sweep {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn values(&self) -> Result<Vec<f64>> {
        let ok = self.start.is_finite()
            && self.stop.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.stop >= self.start;
        if !ok {
            return Err(SimError::InvalidConfig(format!(
                "invalid sweep {}..={} step {}",
                self.start, self.stop, self.step
            )));
        }
        // tolerate accumulated float error on the last point
        let n = ((self.stop - self.start) / self.step + 1e-9).floor() as usize + 1;
        Ok((0..n)
            .map(|i| {
                let x = self.start + self.step * i as f64;
                (x * 1e9).round() / 1e9
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudyKind {
    /// infinite-buffer queue, one point per utilization
    Mm1 {
        utilization: Sweep,
        #[serde(default)]
        mean_packet_bits: Option<f64>,
        #[serde(default)]
        line_rate_bps: Option<f64>,
    },
    /// finite-buffer queue, one point per (capacity, utilization)
    Mm1k {
        utilization: Sweep,
        capacities: Vec<usize>,
        #[serde(default)]
        mean_packet_bits: Option<f64>,
        #[serde(default)]
        line_rate_bps: Option<f64>,
    },
    /// collision domain, one point per node count
    Csma {
        arrival_rate: f64,
        node_counts: Vec<usize>,
        persistent: bool,
        #[serde(default)]
        hold_during_transmission: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudySpec {
    pub study: StudyKind,
    #[serde(default)]
    pub start_horizon_secs: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_events_per_run: Option<f64>,
}

impl StudySpec {
    fn with_kind(study: StudyKind) -> Self {
        Self {
            study,
            start_horizon_secs: None,
            threshold: None,
            max_rounds: None,
            seed: None,
            max_events_per_run: None,
        }
    }

    /// ρ = 0.25 ..= 0.95, step 0.1
    pub fn mm1() -> Self {
        Self::with_kind(StudyKind::Mm1 {
            utilization: Sweep::new(0.25, 0.95, 0.1),
            mean_packet_bits: None,
            line_rate_bps: None,
        })
    }

    /// ρ = 0.5 ..= 1.5, step 0.1, K ∈ {10, 25, 50}
    pub fn mm1k() -> Self {
        Self::with_kind(StudyKind::Mm1k {
            utilization: Sweep::new(0.5, 1.5, 0.1),
            capacities: vec![10, 25, 50],
            mean_packet_bits: None,
            line_rate_bps: None,
        })
    }

    /// A = 12 pkt/s, N ∈ {20, 40, 60, 80, 100}
    pub fn csma(persistent: bool) -> Self {
        Self::with_kind(StudyKind::Csma {
            arrival_rate: 12.0,
            node_counts: vec![20, 40, 60, 80, 100],
            persistent,
            hold_during_transmission: false,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Configuration points in sweep order.
    pub fn scenarios(&self) -> Result<Vec<Scenario>> {
        let out: Vec<Scenario> = match &self.study {
            StudyKind::Mm1 {
                utilization,
                mean_packet_bits,
                line_rate_bps,
            } => utilization
                .values()?
                .into_iter()
                .map(|rho| {
                    let mut p = QueueParams::mm1(rho);
                    override_queue(&mut p, *mean_packet_bits, *line_rate_bps);
                    Scenario::Queue(p)
                })
                .collect(),
            StudyKind::Mm1k {
                utilization,
                capacities,
                mean_packet_bits,
                line_rate_bps,
            } => {
                let rhos = utilization.values()?;
                capacities
                    .iter()
                    .flat_map(|&k| {
                        rhos.iter().map(move |&rho| {
                            let mut p = QueueParams::mm1k(rho, k);
                            override_queue(&mut p, *mean_packet_bits, *line_rate_bps);
                            Scenario::Queue(p)
                        })
                    })
                    .collect()
            }
            StudyKind::Csma {
                arrival_rate,
                node_counts,
                persistent,
                hold_during_transmission,
            } => node_counts
                .iter()
                .map(|&n| {
                    let mut p = CsmaParams::new(n, *arrival_rate, *persistent);
                    p.hold_during_transmission = *hold_during_transmission;
                    Scenario::Csma(p)
                })
                .collect(),
        };
        if out.is_empty() {
            return Err(SimError::InvalidConfig(
                "study has no configuration points".to_string(),
            ));
        }
        Ok(out)
    }

    pub fn settings(&self) -> ConvergenceSettings {
        let d = ConvergenceSettings::default();
        ConvergenceSettings {
            start_horizon: self.start_horizon_secs.map(SimTime).unwrap_or(d.start_horizon),
            threshold: self.threshold.unwrap_or(d.threshold),
            max_rounds: self.max_rounds.unwrap_or(d.max_rounds),
            seed: self.seed,
            max_events_per_run: self.max_events_per_run.unwrap_or(d.max_events_per_run),
        }
    }
}

fn override_queue(p: &mut QueueParams, mean_packet_bits: Option<f64>, line_rate_bps: Option<f64>) {
    if let Some(l) = mean_packet_bits {
        p.mean_packet_bits = l;
    }
    if let Some(c) = line_rate_bps {
        p.line_rate_bps = c;
    }
}
