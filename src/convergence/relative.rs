use crate::metrics::RunResult;

/// `|current - previous| / previous` with the zero-baseline cases pinned:
/// equal values give 0, except an unchanged zero which gives 1. A move away
/// from a zero baseline has no scale and gives 0.
pub fn relative_error(current: f64, previous: f64) -> f64 {
    if current == previous {
        if previous == 0.0 { 1.0 } else { 0.0 }
    } else if previous == 0.0 {
        0.0
    } else {
        (current - previous).abs() / previous.abs()
    }
}

/// Largest relative error over the metrics defined in both runs.
///
/// Metrics absent from either run are undefined and skipped. A metric that
/// is exactly zero in both runs has no scale to compare against and is
/// skipped as well. Returns None when nothing was comparable.
pub fn max_relative_error(current: &RunResult, previous: &RunResult) -> Option<f64> {
    current
        .iter()
        .filter_map(|(metric, cur)| {
            let prev = previous.get(metric)?;
            if cur == 0.0 && prev == 0.0 {
                return None;
            }
            Some(relative_error(cur, prev))
        })
        .reduce(f64::max)
}
