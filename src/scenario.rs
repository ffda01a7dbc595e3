//! 仿真配置点
//!
//! 一个配置点（ρ/缓冲区大小，或节点数/坚持模式）加上 horizon 即为一次运行。

use crate::csma::{CollisionDomainModel, CsmaParams};
use crate::error::{Result, check_horizon};
use crate::metrics::RunResult;
use crate::queue::{QueueModel, QueueParams};
use crate::rv::Sampler;
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq)]
pub enum Scenario {
    Queue(QueueParams),
    Csma(CsmaParams),
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        match self {
            Scenario::Queue(p) => p.validate(),
            Scenario::Csma(p) => p.validate(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Scenario::Queue(p) => p.label(),
            Scenario::Csma(p) => p.label(),
        }
    }

    /// 在 horizon 内预计生成的事件数（队列：到达、离开与观测；CSMA：所有节点的发送时间）
    pub fn expected_events(&self, horizon: SimTime) -> f64 {
        let rate = match self {
            Scenario::Queue(p) => 2.0 * p.arrival_rate() + p.observation_rate(),
            Scenario::Csma(p) => p.node_count as f64 * p.arrival_rate,
        };
        rate * horizon.secs()
    }
}

impl From<QueueParams> for Scenario {
    fn from(p: QueueParams) -> Self {
        Scenario::Queue(p)
    }
}

impl From<CsmaParams> for Scenario {
    fn from(p: CsmaParams) -> Self {
        Scenario::Csma(p)
    }
}

/// 一次运行的完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub scenario: Scenario,
    pub horizon: SimTime,
}

impl RunConfig {
    pub fn new(scenario: impl Into<Scenario>, horizon: SimTime) -> Self {
        Self {
            scenario: scenario.into(),
            horizon,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_horizon(self.horizon)?;
        self.scenario.validate()
    }

    /// 新建模型状态并运行到事件耗尽（或时钟耗尽）
    pub fn run(&self, sampler: &mut Sampler) -> Result<RunResult> {
        self.validate()?;
        match &self.scenario {
            Scenario::Queue(p) => QueueModel::simulate(p.clone(), self.horizon, sampler),
            Scenario::Csma(p) => CollisionDomainModel::simulate(p.clone(), self.horizon, sampler),
        }
    }
}
