use crate::metrics::RunResult;

/// One configuration point's outcome within a round.
#[derive(Debug, Clone)]
pub struct ConfigReport {
    pub index: usize,
    pub label: String,
    pub result: RunResult,
    /// None in the first round, or when no metric was comparable
    pub error: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    /// 0-based
    pub round: u32,
    /// seconds
    pub horizon: f64,
    pub configs: Vec<ConfigReport>,
    /// max over `configs[..].error`; None in the first round
    pub max_error: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ConvergenceOutcome {
    pub rounds: Vec<RoundReport>,
    /// false when the round ceiling was hit first
    pub converged: bool,
}

impl ConvergenceOutcome {
    pub fn last(&self) -> Option<&RoundReport> {
        self.rounds.last()
    }

    /// Horizon of the final round (seconds).
    pub fn final_horizon(&self) -> Option<f64> {
        self.last().map(|r| r.horizon)
    }
}
