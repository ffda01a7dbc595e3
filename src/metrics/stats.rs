//! 统计计数器
//!
//! 每次运行新建、运行内单调不减的计数器。

/// 队列模型计数器
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueCounters {
    pub arrivals: u64,
    pub departures: u64,
    pub observations: u64,
    pub idle_observations: u64,
    pub dropped_arrivals: u64,
}

/// 冲突域（CSMA/CD）计数器
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CsmaCounters {
    /// 发送尝试总数（发送方 + 冲突节点 + 侦听到忙的节点）
    pub attempts: u64,
    pub successes: u64,
    pub collisions: u64,
    /// 达到重试上限被丢弃的包
    pub dropped: u64,
}

/// `num / den`；分母为 0 时无定义。
pub fn ratio(num: u64, den: u64) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}
