//! 队列状态机
//!
//! Idle（缓冲区为空）/ Busy（缓冲区非空），按时间戳顺序消费事件。

use tracing::{debug, trace};

use super::drop_tail::DropTailBuffer;
use super::{BacklogProbe, QueueParams};
use crate::error::{Result, check_horizon};
use crate::metrics::{Metric, QueueCounters, RunResult, RunningMean, ratio};
use crate::rv::Sampler;
use crate::sim::{Event, EventKind, EventScheduler, SimTime, renewal_times};

/// 单服务台 FIFO 队列。每次运行新建，不跨 horizon 复用。
#[derive(Debug)]
pub struct QueueModel {
    params: QueueParams,
    buffer: DropTailBuffer,
    /// 服务台空闲的最早时间（最后一个已接纳作业的离开时间）
    service_watermark: SimTime,
    counters: QueueCounters,
    backlog: RunningMean,
}

impl QueueModel {
    pub fn new(params: QueueParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            buffer: DropTailBuffer::new(params.capacity),
            params,
            service_watermark: SimTime::ZERO,
            counters: QueueCounters::default(),
            backlog: RunningMean::default(),
        })
    }

    /// 生成 `[0, horizon)` 内的到达流与观测流并建堆
    pub fn schedule(&self, horizon: SimTime, sampler: &mut Sampler) -> Result<EventScheduler> {
        check_horizon(horizon)?;
        let arrivals = renewal_times(sampler, self.params.arrival_rate(), horizon)?;
        let observations = renewal_times(sampler, self.params.observation_rate(), horizon)?;
        debug!(
            arrivals = arrivals.len(),
            observations = observations.len(),
            "事件序列已生成"
        );
        Ok(EventScheduler::from_streams([
            (EventKind::Arrival, arrivals),
            (EventKind::Observation, observations),
        ]))
    }

    /// 完整运行一次：建堆、消费到队列耗尽、汇总指标
    #[tracing::instrument(skip_all, fields(cfg = %params.label(), horizon = horizon.secs()))]
    pub fn simulate(params: QueueParams, horizon: SimTime, sampler: &mut Sampler) -> Result<RunResult> {
        let mut model = Self::new(params)?;
        let mut sched = model.schedule(horizon, sampler)?;
        model.process(&mut sched, sampler)?;
        let result = model.finish();
        debug!(counters = ?model.counters, %result, "队列运行结束");
        Ok(result)
    }

    /// 依次弹出事件直到调度器耗尽
    pub fn process(&mut self, sched: &mut EventScheduler, sampler: &mut Sampler) -> Result<()> {
        while let Some(ev) = sched.pop() {
            self.step(ev, sched, sampler)?;
        }
        Ok(())
    }

    /// 处理单个事件
    pub fn step(&mut self, ev: Event, sched: &mut EventScheduler, sampler: &mut Sampler) -> Result<()> {
        match ev.kind {
            EventKind::Arrival => self.on_arrival(ev.at, sched, sampler)?,
            EventKind::Departure => self.on_departure(ev.at),
            EventKind::Observation => self.on_observation(),
        }
        Ok(())
    }

    fn on_arrival(&mut self, at: SimTime, sched: &mut EventScheduler, sampler: &mut Sampler) -> Result<()> {
        self.counters.arrivals += 1;

        let bits = sampler.sample(1.0 / self.params.mean_packet_bits)?;
        let service = bits / self.params.line_rate_bps;
        // 服务台忙则排在水位线之后，否则立即开始服务
        let departs_at = self.service_watermark.max(at) + service;
        if self.buffer.enqueue(departs_at).is_err() {
            self.counters.dropped_arrivals += 1;
            trace!(at = at.secs(), "缓冲区已满，丢弃到达");
            return Ok(());
        }
        self.service_watermark = departs_at;
        sched.schedule(Event::new(departs_at, EventKind::Departure));
        Ok(())
    }

    fn on_departure(&mut self, at: SimTime) {
        self.counters.departures += 1;
        if self.buffer.dequeue().is_none() {
            debug!(at = at.secs(), "空缓冲区上的离开事件");
        }
    }

    fn on_observation(&mut self) {
        self.counters.observations += 1;
        let backlog = self.backlog_now();
        if backlog == 0 {
            self.counters.idle_observations += 1;
        }
        self.backlog.push(backlog as f64);
    }

    fn backlog_now(&self) -> u64 {
        match self.params.probe() {
            BacklogProbe::Occupancy => self.buffer.len() as u64,
            BacklogProbe::ArrivalsMinusDepartures => self
                .counters
                .arrivals
                .saturating_sub(self.counters.departures),
        }
    }

    /// 汇总指标；分母为 0 的指标缺省
    pub fn finish(&self) -> RunResult {
        let c = &self.counters;
        let mut out = RunResult::new();
        out.set(Metric::AvgQueueLength, self.backlog.value());
        out.set(
            Metric::IdleProbability,
            ratio(c.idle_observations, c.observations),
        );
        if self.params.capacity.is_some() {
            out.set(
                Metric::DropProbability,
                ratio(c.dropped_arrivals, c.arrivals),
            );
        }
        out
    }

    pub fn counters(&self) -> &QueueCounters {
        &self.counters
    }

    pub fn occupancy(&self) -> usize {
        self.buffer.len()
    }

    pub fn service_watermark(&self) -> SimTime {
        self.service_watermark
    }

    pub fn params(&self) -> &QueueParams {
        &self.params
    }
}
