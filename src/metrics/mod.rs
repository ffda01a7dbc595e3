//! 指标累积模块
//!
//! 模型内部的运行统计（累积移动平均、计数器）以及运行结束后的指标集合。

mod result;
mod running_mean;
mod stats;

pub use result::{Metric, RunResult};
pub use running_mean::RunningMean;
pub use stats::{CsmaCounters, QueueCounters, ratio};
