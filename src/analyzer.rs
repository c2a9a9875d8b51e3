//! Per-dialect analysis pipelines
//!
//! One entry point per log dialect. Both read the whole log into memory,
//! fold it through the matching reconstructor, and summarize the resulting
//! series. Data flows one way: raw lines, classified events, reconstructed
//! timeline, statistics.

use std::fs;

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::error::ForgeResult;
use crate::stats::{self, SeriesSummary};
use crate::timeline::{self, ArrivalTimes};

/// Which log dialect produced the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Fixed-batching backend
    Fast,
    /// Continuous-batching backend
    Flex,
}

/// Aggregate statistics for one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub dialect: Dialect,
    pub total_requests: usize,
    pub kernel_time: SeriesSummary,
    pub latency_ms: SeriesSummary,
    /// Net tokens generated per second of wall clock
    pub throughput: f64,
    pub total_time_seconds: f64,
    pub tokens_generated: i64,
    /// Downsampled batch-size samples; flex only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_sizes: Option<Vec<u64>>,
}

/// Full result of one analysis: the aggregate report plus the per-record
/// series the CSV emitter needs.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub report: AnalysisReport,
    /// Kernel-time series in batch order, ready for `kernel_<n>.csv`
    pub kernel_series: Vec<f64>,
    /// `(request id, latency ms)` rows for `latency_<n>.csv`
    pub latency_rows: Vec<(u64, f64)>,
}

/// Analyze a fast-dialect benchmark log.
pub fn analyze_fast(config: &AnalyzerConfig) -> ForgeResult<Analysis> {
    config.validate()?;
    let lines = read_lines(config)?;

    let timeline = timeline::scan_fast(&lines, config.chars_per_token);
    tracing::debug!(
        kernels = timeline.kernel_times.len(),
        latencies = timeline.latencies_ms.len(),
        "fast scan complete"
    );

    let kernel_time = stats::summarize("kernel time", &timeline.kernel_times)?;
    let latency_ms = stats::summarize("latency", &timeline.latencies_ms)?;
    let throughput = stats::fast_throughput(timeline.max_token_count, timeline.max_total_time)?;

    let latency_rows = timeline
        .latencies_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| (i as u64, ms))
        .collect();

    Ok(Analysis {
        report: AnalysisReport {
            dialect: Dialect::Fast,
            total_requests: timeline.latencies_ms.len(),
            kernel_time,
            latency_ms,
            throughput,
            total_time_seconds: timeline.max_total_time,
            tokens_generated: timeline.max_token_count as i64,
            batch_sizes: None,
        },
        kernel_series: timeline.kernel_times,
        latency_rows,
    })
}

/// Analyze a flex-dialect benchmark log.
///
/// Reads the arrival-time side file first; every request id in the log must
/// have an arrival entry, and every completion must reference a known id.
pub fn analyze_flex(config: &AnalyzerConfig) -> ForgeResult<Analysis> {
    config.validate()?;
    let lines = read_lines(config)?;
    let arrivals = ArrivalTimes::load(&config.arrival_path)?;
    tracing::debug!(arrivals = arrivals.len(), "arrival times loaded");

    let reconstructor = timeline::scan_flex(&lines, arrivals)?;
    let timeline = reconstructor.finish(config.num_gpu, config.stride)?;
    tracing::debug!(
        requests = timeline.total_requests(),
        kernels = timeline.kernel_ms.len(),
        "flex reconstruction complete"
    );

    let kernel_time = stats::summarize("kernel time", &timeline.kernel_ms)?;
    let latencies: Vec<f64> = timeline.latencies_ms.iter().map(|&(_, ms)| ms).collect();
    let latency_ms = stats::summarize("latency", &latencies)?;
    let tokens_generated = timeline.tokens_generated();
    let throughput = stats::flex_throughput(tokens_generated, timeline.elapsed_seconds)?;

    Ok(Analysis {
        report: AnalysisReport {
            dialect: Dialect::Flex,
            total_requests: timeline.total_requests(),
            kernel_time,
            latency_ms,
            throughput,
            total_time_seconds: timeline.elapsed_seconds,
            tokens_generated,
            batch_sizes: Some(timeline.batch_sizes),
        },
        kernel_series: timeline.kernel_ms,
        latency_rows: timeline.latencies_ms,
    })
}

fn read_lines(config: &AnalyzerConfig) -> ForgeResult<Vec<String>> {
    let contents = fs::read_to_string(&config.input)?;
    let lines: Vec<String> = contents.lines().map(str::to_string).collect();
    tracing::info!(path = %config.input.display(), lines = lines.len(), "log file loaded");
    Ok(lines)
}
