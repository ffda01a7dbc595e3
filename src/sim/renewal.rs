//! 更新过程（renewal process）事件时间生成

use super::time::SimTime;
use crate::error::{Result, SimError, check_rate};
use crate::rv::Sampler;

/// 单条更新流预计事件数的上限；超过则在分配前拒绝
pub const MAX_STREAM_EVENTS: f64 = 100_000_000.0;

/// 以速率 `rate` 生成 `[0, horizon)` 内的泊松到达时间（升序）。
///
/// 不断累加指数间隔直到越过 horizon，最后一次越界的抽样被丢弃。
pub fn renewal_times(sampler: &mut Sampler, rate: f64, horizon: SimTime) -> Result<Vec<SimTime>> {
    // horizon 为 0 时也要拒绝非法速率
    check_rate(rate)?;
    let expected = rate * horizon.secs();
    if expected.is_nan() || expected > MAX_STREAM_EVENTS {
        return Err(SimError::InvalidConfig(format!(
            "stream at rate {rate} over T={} expects {expected:.0} events (limit {MAX_STREAM_EVENTS:.0})",
            horizon.secs()
        )));
    }

    let mut times = Vec::with_capacity(expected.max(0.0) as usize + 16);
    let mut running = 0.0;
    loop {
        running += sampler.sample(rate)?;
        if running >= horizon.secs() {
            break;
        }
        times.push(SimTime(running));
    }
    Ok(times)
}
