//! 冲突域状态机
//!
//! 每一步选出全局最早的待发送时间作为发送方，按比特到达窗口
//! `[firstBit, lastBit)` 判定其他节点：冲突、侦听到忙或无交互。
//! 终止条件：所有节点的最小待发送时间不早于 horizon（时钟耗尽）。

use tracing::{debug, trace};

use super::CsmaParams;
use super::node::{CollisionNode, NodeId};
use crate::error::{Result, SimError, check_horizon};
use crate::metrics::{CsmaCounters, Metric, RunResult, ratio};
use crate::rv::Sampler;
use crate::sim::{SimTime, renewal_times};

/// 退避时使用的计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backoff {
    Collision,
    Sense,
}

/// 一步中对某个非发送节点的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interaction {
    Collision,
    SensedBusy { last_bit: SimTime },
    None,
}

#[derive(Debug)]
pub struct CollisionDomainModel {
    params: CsmaParams,
    horizon: SimTime,
    nodes: Vec<CollisionNode>,
    counters: CsmaCounters,
}

impl CollisionDomainModel {
    /// 为每个节点生成独立的泊松发送时间序列
    pub fn new(params: CsmaParams, horizon: SimTime, sampler: &mut Sampler) -> Result<Self> {
        params.validate()?;
        check_horizon(horizon)?;
        let nodes = (0..params.node_count)
            .map(|i| {
                renewal_times(sampler, params.arrival_rate, horizon)
                    .map(|times| CollisionNode::new(NodeId(i), times))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            params,
            horizon,
            nodes,
            counters: CsmaCounters::default(),
        })
    }

    /// 使用给定的发送时间序列（第 i 项对应节点 i）
    pub fn with_pending(params: CsmaParams, horizon: SimTime, pending: Vec<Vec<SimTime>>) -> Result<Self> {
        params.validate()?;
        check_horizon(horizon)?;
        if pending.len() != params.node_count {
            return Err(SimError::InvalidConfig(format!(
                "expected {} pending sequences, got {}",
                params.node_count,
                pending.len()
            )));
        }
        let nodes = pending
            .into_iter()
            .enumerate()
            .map(|(i, times)| CollisionNode::new(NodeId(i), times))
            .collect();
        Ok(Self {
            params,
            horizon,
            nodes,
            counters: CsmaCounters::default(),
        })
    }

    /// 完整运行一次
    #[tracing::instrument(skip_all, fields(cfg = %params.label(), horizon = horizon.secs()))]
    pub fn simulate(params: CsmaParams, horizon: SimTime, sampler: &mut Sampler) -> Result<RunResult> {
        let mut model = Self::new(params, horizon, sampler)?;
        model.run(sampler);
        let result = model.finish();
        debug!(counters = ?model.counters, %result, "冲突域运行结束");
        Ok(result)
    }

    pub fn run(&mut self, sampler: &mut Sampler) {
        while self.step(sampler) {}
    }

    /// 全局最早的待发送时间及其节点
    fn next_sender(&self) -> Option<(usize, SimTime)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.head().map(|t| (i, t)))
            .min_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// 推进一个发送方；没有早于 horizon 的待发送包时返回 false
    pub fn step(&mut self, sampler: &mut Sampler) -> bool {
        let Some((sender, t)) = self.next_sender() else {
            return false;
        };
        if t >= self.horizon {
            return false;
        }

        let trans = self.params.transmission_delay();
        let prop = self.params.propagation_delay();
        self.counters.attempts += 1;

        let mut collided = false;
        for i in 0..self.nodes.len() {
            if i == sender {
                continue;
            }
            let Some(head) = self.nodes[i].head() else {
                continue;
            };
            let hops = NodeId(i).distance(NodeId(sender)) as f64;
            let first_bit = t + hops * prop;
            let last_bit = first_bit + trans;

            match classify(head, first_bit, last_bit) {
                Interaction::Collision => {
                    self.counters.attempts += 1;
                    self.counters.collisions += 1;
                    collided = true;
                    self.nodes[i].collision_counter += 1;
                    trace!(node = i, sender, at = t.secs(), "冲突");
                    self.backoff_or_drop(i, Backoff::Collision, t, sampler);
                }
                Interaction::SensedBusy { last_bit } => {
                    self.counters.attempts += 1;
                    if self.params.persistent {
                        self.nodes[i].defer_head(last_bit);
                    } else {
                        self.nodes[i].sense_counter += 1;
                        self.backoff_or_drop(i, Backoff::Sense, t, sampler);
                    }
                }
                Interaction::None => {}
            }
        }

        if collided {
            self.nodes[sender].collision_counter += 1;
            self.backoff_or_drop(sender, Backoff::Collision, t, sampler);
        } else {
            let node = &mut self.nodes[sender];
            node.pop_head();
            node.reset_counters();
            if self.params.hold_during_transmission {
                node.hold_until(t + trans);
            }
            self.counters.successes += 1;
        }
        true
    }

    /// 二进制指数退避；计数器超过重试上限则丢弃队首包并清零
    fn backoff_or_drop(&mut self, idx: usize, kind: Backoff, now: SimTime, sampler: &mut Sampler) {
        let max_retries = self.params.max_retries;
        let slot = self.params.slot_time();
        let node = &mut self.nodes[idx];
        let k = match kind {
            Backoff::Collision => node.collision_counter,
            Backoff::Sense => node.sense_counter,
        };
        if k > max_retries {
            node.pop_head();
            node.reset_counters();
            self.counters.dropped += 1;
            debug!(node = idx, ?kind, "超过重试上限，丢弃");
            return;
        }
        let window = 2f64.powi(k as i32) - 1.0;
        let wait = sampler.uniform(0.0, window) * slot;
        node.defer_head(now + wait);
    }

    /// 汇总指标；没有任何发送尝试时效率缺省
    pub fn finish(&self) -> RunResult {
        let c = &self.counters;
        let mut out = RunResult::new();
        out.set(Metric::Efficiency, ratio(c.successes, c.attempts));
        out.set(
            Metric::Throughput,
            Some(c.successes as f64 * self.params.packet_bits / self.horizon.secs()),
        );
        out
    }

    pub fn counters(&self) -> &CsmaCounters {
        &self.counters
    }

    pub fn nodes(&self) -> &[CollisionNode] {
        &self.nodes
    }

    pub fn params(&self) -> &CsmaParams {
        &self.params
    }
}

fn classify(head: SimTime, first_bit: SimTime, last_bit: SimTime) -> Interaction {
    if head < first_bit {
        Interaction::Collision
    } else if head < last_bit {
        Interaction::SensedBusy { last_bit }
    } else {
        Interaction::None
    }
}
