//! 收敛控制器
//!
//! 每一轮在当前 horizon 下并行运行所有配置点，与上一轮结果比较相对误差，
//! 然后把 horizon 加倍。第一轮只作为基线，从不据此判断收敛。

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::relative::max_relative_error;
use super::report::{ConfigReport, ConvergenceOutcome, RoundReport};
use crate::error::{Result, SimError, check_horizon};
use crate::metrics::RunResult;
use crate::rv::Sampler;
use crate::scenario::{RunConfig, Scenario};
use crate::sim::SimTime;

pub const DEFAULT_START_HORIZON_SECS: f64 = 1_000.0;
pub const DEFAULT_THRESHOLD: f64 = 0.05;
pub const DEFAULT_MAX_ROUNDS: u32 = 12;
/// 单次运行预计事件数上限（约 20M 个堆元素，每个 24 字节）
pub const DEFAULT_MAX_EVENTS_PER_RUN: f64 = 20_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceSettings {
    pub start_horizon: SimTime,
    /// stop once the round's max relative error is <= this
    pub threshold: f64,
    /// hard ceiling on the number of rounds
    pub max_rounds: u32,
    /// None: every run draws from OS entropy
    pub seed: Option<u64>,
    /// stop doubling before any run would exceed this many expected events
    pub max_events_per_run: f64,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            start_horizon: SimTime(DEFAULT_START_HORIZON_SECS),
            threshold: DEFAULT_THRESHOLD,
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
            max_events_per_run: DEFAULT_MAX_EVENTS_PER_RUN,
        }
    }
}

impl ConvergenceSettings {
    pub fn validate(&self) -> Result<()> {
        check_horizon(self.start_horizon)?;
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "threshold must be finite and > 0, got {}",
                self.threshold
            )));
        }
        // 至少需要两轮才能做一次比较
        if self.max_rounds < 2 {
            return Err(SimError::InvalidConfig(format!(
                "max_rounds must be >= 2, got {}",
                self.max_rounds
            )));
        }
        if !(self.max_events_per_run.is_finite() && self.max_events_per_run > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "max_events_per_run must be finite and > 0, got {}",
                self.max_events_per_run
            )));
        }
        Ok(())
    }
}

/// 收敛状态：每个配置点上一轮的结果与本轮误差
#[derive(Debug, Clone, Default)]
struct ConvergenceState {
    previous: Option<RunResult>,
    error: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ConvergenceController {
    scenarios: Vec<Scenario>,
    settings: ConvergenceSettings,
}

impl ConvergenceController {
    /// 所有配置点在生成任何事件之前完成校验
    pub fn new(scenarios: Vec<Scenario>, settings: ConvergenceSettings) -> Result<Self> {
        if scenarios.is_empty() {
            return Err(SimError::InvalidConfig(
                "at least one configuration point is required".to_string(),
            ));
        }
        settings.validate()?;
        for s in &scenarios {
            s.validate()?;
        }
        let first = settings.start_horizon;
        if let Some(s) = over_budget(&scenarios, first, settings.max_events_per_run) {
            return Err(SimError::InvalidConfig(format!(
                "{} expects more than {} events at T={}",
                s.label(),
                settings.max_events_per_run,
                first.secs()
            )));
        }
        Ok(Self {
            scenarios,
            settings,
        })
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn settings(&self) -> &ConvergenceSettings {
        &self.settings
    }

    pub fn run(&self) -> Result<ConvergenceOutcome> {
        self.run_with(|_| {})
    }

    /// 运行加倍循环；每轮结束后调用 `observe`
    #[tracing::instrument(skip_all, fields(configs = self.scenarios.len(), seed = ?self.settings.seed))]
    pub fn run_with<F>(&self, mut observe: F) -> Result<ConvergenceOutcome>
    where
        F: FnMut(&RoundReport),
    {
        let mut states = vec![ConvergenceState::default(); self.scenarios.len()];
        let mut rounds = Vec::new();
        let mut horizon = self.settings.start_horizon;

        for round in 0..self.settings.max_rounds {
            if let Some(s) = over_budget(&self.scenarios, horizon, self.settings.max_events_per_run) {
                warn!(
                    round,
                    horizon = horizon.secs(),
                    cfg = %s.label(),
                    "下一轮超出事件预算，停止加倍"
                );
                return Ok(ConvergenceOutcome {
                    rounds,
                    converged: false,
                });
            }
            let results = self.run_round(round, horizon)?;

            let mut configs = Vec::with_capacity(results.len());
            for (index, (state, result)) in states.iter_mut().zip(results).enumerate() {
                state.error = state
                    .previous
                    .as_ref()
                    .and_then(|prev| max_relative_error(&result, prev));
                configs.push(ConfigReport {
                    index,
                    label: self.scenarios[index].label(),
                    result: result.clone(),
                    error: state.error,
                });
                state.previous = Some(result);
            }

            let max_error = if round == 0 {
                None
            } else {
                states.iter().filter_map(|s| s.error).reduce(f64::max)
            };
            info!(round, horizon = horizon.secs(), ?max_error, "收敛轮次完成");

            let report = RoundReport {
                round,
                horizon: horizon.secs(),
                configs,
                max_error,
            };
            observe(&report);
            rounds.push(report);

            if max_error.is_some_and(|e| e <= self.settings.threshold) {
                return Ok(ConvergenceOutcome {
                    rounds,
                    converged: true,
                });
            }
            horizon = SimTime(horizon.secs() * 2.0);
        }

        warn!(
            max_rounds = self.settings.max_rounds,
            "达到轮次上限仍未收敛"
        );
        Ok(ConvergenceOutcome {
            rounds,
            converged: false,
        })
    }

    /// 并行运行一轮中的所有配置点，结果按配置顺序返回
    fn run_round(&self, round: u32, horizon: SimTime) -> Result<Vec<RunResult>> {
        debug!(round, horizon = horizon.secs(), "开始一轮");
        self.scenarios
            .par_iter()
            .enumerate()
            .map(|(index, scenario)| {
                let mut sampler = self.sampler_for(round, index);
                RunConfig::new(scenario.clone(), horizon).run(&mut sampler)
            })
            .collect()
    }

    fn sampler_for(&self, round: u32, index: usize) -> Sampler {
        match self.settings.seed {
            Some(base) => Sampler::seeded(Sampler::derive_seed(base, round, index)),
            None => Sampler::from_entropy(),
        }
    }
}

fn over_budget(scenarios: &[Scenario], horizon: SimTime, budget: f64) -> Option<&Scenario> {
    scenarios
        .iter()
        .find(|s| s.expected_events(horizon) > budget)
}
