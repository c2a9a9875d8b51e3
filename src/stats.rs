//! Summary statistics over reconstructed series
//!
//! Pure functions over numeric slices. Every statistic here is defined only
//! for a non-empty series; callers either guarantee a sample or handle the
//! `EmptySeries` error with a diagnostic instead of dividing by zero.

use serde::Serialize;

use crate::error::{ForgeResult, LogForgeError};

/// Summary of one numeric series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n-1 denominator); 0.0 for a single sample
    pub std_dev: f64,
}

/// Summarize a series, failing with a "no samples collected" diagnostic when
/// it is empty. `label` names the series in that diagnostic.
pub fn summarize(label: &'static str, values: &[f64]) -> ForgeResult<SeriesSummary> {
    if values.is_empty() {
        return Err(LogForgeError::EmptySeries(label));
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let std_dev = if count < 2 {
        0.0
    } else {
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    };

    Ok(SeriesSummary {
        count,
        sum,
        mean,
        min,
        max,
        std_dev,
    })
}

/// Fast-dialect throughput: peak token count over peak wall clock.
pub fn fast_throughput(max_token_count: u64, max_total_time: f64) -> ForgeResult<f64> {
    if max_total_time <= 0.0 {
        return Err(LogForgeError::ZeroWallClock(
            "no total-time reading observed in the log",
        ));
    }
    Ok(max_token_count as f64 / max_total_time)
}

/// Flex-dialect throughput: net generated tokens over run wall clock.
pub fn flex_throughput(tokens_generated: i64, elapsed_seconds: f64) -> ForgeResult<f64> {
    if elapsed_seconds <= 0.0 {
        return Err(LogForgeError::ZeroWallClock(
            "elapsed wall clock is zero or negative",
        ));
    }
    Ok(tokens_generated as f64 / elapsed_seconds)
}
