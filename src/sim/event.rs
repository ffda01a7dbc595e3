//! 事件类型
//!
//! 队列模型消费的封闭事件集合：只携带时间戳与种类。

use super::time::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Arrival,
    Departure,
    Observation,
}

/// 单个仿真事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub at: SimTime,
    pub kind: EventKind,
}

impl Event {
    pub fn new(at: SimTime, kind: EventKind) -> Self {
        Self { at, kind }
    }
}
