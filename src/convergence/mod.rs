//! 收敛控制模块
//!
//! 以加倍的 horizon 重复运行每个配置点，直到相邻两轮的指标相对误差
//! 都不超过阈值（或达到轮次上限）。

mod controller;
mod relative;
mod report;

pub use controller::{
    ConvergenceController, ConvergenceSettings, DEFAULT_MAX_EVENTS_PER_RUN, DEFAULT_MAX_ROUNDS,
    DEFAULT_START_HORIZON_SECS, DEFAULT_THRESHOLD,
};
pub use relative::{max_relative_error, relative_error};
pub use report::{ConfigReport, ConvergenceOutcome, RoundReport};
