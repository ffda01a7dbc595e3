//! 仿真时间类型
//!
//! 定义仿真时间（秒，f64）及其全序比较。

use std::cmp::Ordering;
use std::ops::Add;

/// 仿真时间（秒）。
///
/// 比较使用 `f64::total_cmp`，因此可以直接放入 `BinaryHeap`。
#[derive(Debug, Clone, Copy, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn from_millis(ms: f64) -> SimTime {
        SimTime(ms / 1_000.0)
    }

    pub fn from_micros(us: f64) -> SimTime {
        SimTime(us / 1_000_000.0)
    }

    pub fn secs(self) -> f64 {
        self.0
    }

    pub fn max(self, other: SimTime) -> SimTime {
        if self >= other { self } else { other }
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, secs: f64) -> SimTime {
        SimTime(self.0 + secs)
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}
