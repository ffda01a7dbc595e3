//! DropTail（尾丢弃）作业缓冲区
//!
//! 缓冲区已满时直接丢弃新到达的作业；容量为 None 表示无界。
//! 每个元素是该作业的离开时间，队首即正在服务的作业。

use std::collections::VecDeque;

use crate::sim::SimTime;

#[derive(Debug, Default)]
pub struct DropTailBuffer {
    capacity: Option<usize>,
    q: VecDeque<SimTime>,
}

impl DropTailBuffer {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            q: VecDeque::new(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// 入队：成功返回 Ok；缓冲区满则返回 Err(departs_at)
    pub fn enqueue(&mut self, departs_at: SimTime) -> Result<(), SimTime> {
        if self.is_full() {
            return Err(departs_at);
        }
        self.q.push_back(departs_at);
        Ok(())
    }

    /// 出队：FIFO，返回队首作业的离开时间
    pub fn dequeue(&mut self) -> Option<SimTime> {
        self.q.pop_front()
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.q.len() >= cap)
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
