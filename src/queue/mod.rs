//! 单服务台 FIFO 队列（M/M/1 与 M/M/1/K）
//!
//! 到达与观测是两条独立的泊松流，离开事件在处理到达时按服务水位线插入。

mod drop_tail;
mod model;

pub use drop_tail::DropTailBuffer;
pub use model::QueueModel;

use crate::error::{Result, SimError, check_rate};

/// 平均包长（bit）
pub const DEFAULT_MEAN_PACKET_BITS: f64 = 2_000.0;
/// 链路速率（bit/s）
pub const DEFAULT_LINE_RATE_BPS: f64 = 1_000_000.0;
/// 观测事件速率 = 到达速率 × 该系数
pub const DEFAULT_OBSERVATION_FACTOR: f64 = 5.0;

/// 观测时队列长度的取样方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacklogProbe {
    /// 缓冲区中的作业数（有限缓冲区）
    Occupancy,
    /// 到达数 − 离开数（无限缓冲区）
    ArrivalsMinusDepartures,
}

/// 队列模型参数
#[derive(Debug, Clone, PartialEq)]
pub struct QueueParams {
    /// ρ = λ·L / C
    pub utilization: f64,
    /// None 表示无限缓冲区（包含正在服务的作业）
    pub capacity: Option<usize>,
    pub mean_packet_bits: f64,
    pub line_rate_bps: f64,
    pub observation_factor: f64,
}

impl QueueParams {
    /// 无限缓冲区 M/M/1
    pub fn mm1(utilization: f64) -> Self {
        Self {
            utilization,
            capacity: None,
            mean_packet_bits: DEFAULT_MEAN_PACKET_BITS,
            line_rate_bps: DEFAULT_LINE_RATE_BPS,
            observation_factor: DEFAULT_OBSERVATION_FACTOR,
        }
    }

    /// 容量为 `capacity` 的 M/M/1/K
    pub fn mm1k(utilization: f64, capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::mm1(utilization)
        }
    }

    /// 到达速率 λ = C·ρ / L
    pub fn arrival_rate(&self) -> f64 {
        self.line_rate_bps * self.utilization / self.mean_packet_bits
    }

    /// 观测速率 α = factor·λ
    pub fn observation_rate(&self) -> f64 {
        self.arrival_rate() * self.observation_factor
    }

    pub fn probe(&self) -> BacklogProbe {
        match self.capacity {
            Some(_) => BacklogProbe::Occupancy,
            None => BacklogProbe::ArrivalsMinusDepartures,
        }
    }

    /// 在生成任何事件之前校验参数
    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(SimError::InvalidConfig(
                "buffer capacity must be > 0".to_string(),
            ));
        }
        check_rate(self.mean_packet_bits)?;
        check_rate(self.line_rate_bps)?;
        check_rate(self.arrival_rate())?;
        check_rate(self.observation_rate())?;
        Ok(())
    }

    pub fn label(&self) -> String {
        match self.capacity {
            Some(k) => format!("rho={:.2} K={k}", self.utilization),
            None => format!("rho={:.2} K=inf", self.utilization),
        }
    }
}
