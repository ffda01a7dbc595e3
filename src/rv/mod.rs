//! Random variate generation.
//!
//! Exponential inter-event times via the inverse-CDF transform and the
//! uniform draws used by binary exponential backoff. Every run owns its own
//! `Sampler`; seeding is explicit so studies can be replayed.

mod summary;

pub use summary::{SampleSummary, summarize};

use rand::prelude::*;

use crate::error::{Result, check_rate};

#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Reproducible sampler.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible sampler backed by OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed for run `index` of round `round` of a study seeded with `base`.
    ///
    /// Independent of the order in which worker threads pick up runs.
    pub fn derive_seed(base: u64, round: u32, index: usize) -> u64 {
        // splitmix64 finalizer over the packed coordinates
        let mut z = base
            ^ (u64::from(round) << 32)
            ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// One draw from Exponential(rate).
    pub fn sample(&mut self, rate: f64) -> Result<f64> {
        let rate = check_rate(rate)?;
        let u: f64 = self.rng.gen_range(0.0..1.0);
        // 1 - u lies in (0, 1], so ln is finite
        Ok(-(1.0 - u).ln() / rate)
    }

    /// `count` independent draws from Exponential(rate).
    pub fn sample_batch(&mut self, rate: f64, count: usize) -> Result<Vec<f64>> {
        let rate = check_rate(rate)?;
        Ok((0..count)
            .map(|_| {
                let u: f64 = self.rng.gen_range(0.0..1.0);
                -(1.0 - u).ln() / rate
            })
            .collect())
    }

    /// Uniform draw from `[lo, hi)`; returns `lo` for an empty range.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo {
            self.rng.gen_range(lo..hi)
        } else {
            lo
        }
    }
}
