//! 调度事件
//!
//! 定义调度事件结构及其优先级比较。

use super::event::Event;
use std::cmp::Ordering;

/// 调度事件，包含事件本身与插入序列号（同一时间戳按插入顺序出队）。
#[derive(Debug)]
pub struct ScheduledEvent {
    pub(crate) seq: u64,
    pub(crate) ev: Event,
}

// BinaryHeap 是 max-heap；我们需要最小时间优先，因此反向比较。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.ev.at.cmp(&other.ev.at) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.ev.at == other.ev.at && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}
