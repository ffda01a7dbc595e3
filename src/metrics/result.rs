use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Steady-state metrics a model can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AvgQueueLength,
    IdleProbability,
    DropProbability,
    Efficiency,
    /// bits per second
    Throughput,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::AvgQueueLength => "avg_queue_length",
            Metric::IdleProbability => "idle_probability",
            Metric::DropProbability => "drop_probability",
            Metric::Efficiency => "efficiency",
            Metric::Throughput => "throughput",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final metrics of one run. A metric that was undefined for the run
/// (zero denominator) is absent rather than NaN.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunResult {
    values: BTreeMap<Metric, f64>,
}

impl RunResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` if defined; `None` leaves the metric absent.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match value {
            Some(v) if v.is_finite() => {
                self.values.insert(metric, v);
            }
            _ => {
                self.values.remove(&metric);
            }
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (m, v) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{m}={v:.8}")?;
        }
        Ok(())
    }
}
