//! 事件调度器
//!
//! 维护一次仿真运行的事件最小堆：更新过程事件批量建堆，
//! 运行中产生的事件（如 Departure）按需插入。

use super::event::{Event, EventKind};
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use std::collections::BinaryHeap;
use tracing::trace;

/// 事件调度器：时间戳最小者先出；时间戳相同按插入顺序。
#[derive(Debug, Default)]
pub struct EventScheduler {
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由若干条预先生成的更新过程批量建堆（O(n) heapify）。
    pub fn from_streams<I>(streams: I) -> Self
    where
        I: IntoIterator<Item = (EventKind, Vec<SimTime>)>,
    {
        let mut next_seq = 0u64;
        let mut items = Vec::new();
        for (kind, times) in streams {
            items.reserve(times.len());
            for at in times {
                items.push(ScheduledEvent {
                    seq: next_seq,
                    ev: Event::new(at, kind),
                });
                next_seq += 1;
            }
        }
        Self {
            next_seq,
            q: BinaryHeap::from(items),
        }
    }

    /// 调度事件
    pub fn schedule(&mut self, ev: Event) {
        let seq = self.next_seq;
        trace!(at = ev.at.secs(), kind = ?ev.kind, seq, "调度事件");
        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent { seq, ev });
    }

    /// 取出最早的事件；队列耗尽时返回 None（这是一次运行的正常结束信号）。
    pub fn pop(&mut self) -> Option<Event> {
        self.q.pop().map(|item| item.ev)
    }

    pub fn has_next(&self) -> bool {
        !self.q.is_empty()
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.q.peek().map(|item| item.ev.at)
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
}
