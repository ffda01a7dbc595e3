/// Cumulative moving average: `avg <- avg + (x - avg) / n`, O(1) memory.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    n: u64,
    avg: f64,
}

impl RunningMean {
    pub fn push(&mut self, x: f64) {
        self.n += 1;
        self.avg += (x - self.avg) / self.n as f64;
    }

    pub fn count(&self) -> u64 {
        self.n
    }

    /// None until at least one sample was pushed.
    pub fn value(&self) -> Option<f64> {
        (self.n > 0).then_some(self.avg)
    }
}
