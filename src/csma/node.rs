//! 冲突域节点
//!
//! 每个节点持有自己的待发送时间序列（升序，从队首消费）以及两个退避计数器。

use std::collections::VecDeque;

use crate::sim::SimTime;

/// 节点标识符（总线上的位置下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// 线性总线上两节点间隔的段数
    pub fn distance(self, other: NodeId) -> usize {
        self.0.abs_diff(other.0)
    }
}

#[derive(Debug, Clone)]
pub struct CollisionNode {
    pub id: NodeId,
    pending: VecDeque<SimTime>,
    /// 连续冲突次数
    pub collision_counter: u32,
    /// 非坚持模式下连续侦听到忙的次数
    pub sense_counter: u32,
}

impl CollisionNode {
    pub fn new(id: NodeId, pending: impl IntoIterator<Item = SimTime>) -> Self {
        let mut pending: Vec<SimTime> = pending.into_iter().collect();
        pending.sort();
        Self {
            id,
            pending: pending.into(),
            collision_counter: 0,
            sense_counter: 0,
        }
    }

    pub fn head(&self) -> Option<SimTime> {
        self.pending.front().copied()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = SimTime> + '_ {
        self.pending.iter().copied()
    }

    /// 移除队首包（发送成功或被丢弃）
    pub fn pop_head(&mut self) -> Option<SimTime> {
        self.pending.pop_front()
    }

    /// 把队首包推迟到 `at`；排在后面、早于 `at` 的包一并推迟，保持升序。
    pub fn defer_head(&mut self, at: SimTime) {
        if let Some(head) = self.pending.front_mut() {
            *head = at;
        }
        for t in self.pending.iter_mut().skip(1) {
            if *t >= at {
                break;
            }
            *t = at;
        }
    }

    /// 所有早于 `at` 的待发送包推迟到 `at`（自身发送期间不能再发送）
    pub fn hold_until(&mut self, at: SimTime) {
        for t in self.pending.iter_mut() {
            if *t >= at {
                break;
            }
            *t = at;
        }
    }

    pub fn reset_counters(&mut self) {
        self.collision_counter = 0;
        self.sense_counter = 0;
    }
}
