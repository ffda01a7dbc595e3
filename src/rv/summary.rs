use super::Sampler;
use crate::error::Result;

/// Empirical moments of a batch of exponential draws next to their
/// theoretical values.
#[derive(Debug, Clone)]
pub struct SampleSummary {
    pub rate: f64,
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub expected_mean: f64,
    pub expected_variance: f64,
}

impl SampleSummary {
    pub fn mean_error_pct(&self) -> f64 {
        100.0 * (self.mean - self.expected_mean) / self.expected_mean
    }

    pub fn variance_error_pct(&self) -> f64 {
        100.0 * (self.variance - self.expected_variance) / self.expected_variance
    }
}

/// Draw `count` samples at `rate` and report mean and population variance.
pub fn summarize(sampler: &mut Sampler, rate: f64, count: usize) -> Result<SampleSummary> {
    if count == 0 {
        return Err(crate::SimError::InvalidConfig(
            "sample count must be > 0".to_string(),
        ));
    }
    let xs = sampler.sample_batch(rate, count)?;
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let expected_mean = 1.0 / rate;
    Ok(SampleSummary {
        rate,
        count,
        mean,
        variance,
        expected_mean,
        expected_variance: expected_mean * expected_mean,
    })
}
