//! 错误类型
//!
//! 仿真配置与 study 文件加载的错误。退化指标（分母为 0）不是错误，
//! 它们在 `RunResult` 中直接缺省。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// 指数分布/更新过程的速率必须为有限正数
    #[error("invalid rate {rate}: must be finite and > 0")]
    InvalidRate { rate: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// 校验速率参数（非正数、NaN、无穷大均拒绝）
pub(crate) fn check_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(SimError::InvalidRate { rate })
    }
}

/// 仿真时长必须为有限正数
pub(crate) fn check_horizon(horizon: crate::sim::SimTime) -> Result<()> {
    let secs = horizon.secs();
    if secs.is_finite() && secs > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "horizon must be finite and > 0, got {secs}"
        )))
    }
}
