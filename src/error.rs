//! Unified error handling for logforge
//!
//! This module provides a centralized error type that consolidates all
//! failure modes of the analyzer. It implements error categorization for:
//! - Consistency errors (corrupted logs, broken request timelines)
//! - Data errors (empty series, missing arrival samples)
//! - Configuration errors (invalid analyzer settings)
//! - I/O errors (file system failures)
//!
//! Per-line parse failures are deliberately NOT represented here: a log line
//! that does not match any known shape is skipped, never reported. Benchmark
//! logs routinely interleave unrelated diagnostic output.

/// Unified error type for logforge
///
/// Consistency errors abort an analysis run outright; partial results from a
/// corrupted log would be misleading.
#[derive(Debug, thiserror::Error)]
pub enum LogForgeError {
    // ========== Consistency Errors ==========
    /// Completion event for a request id that never arrived
    #[error("completion logged for unknown request id {0}")]
    UnknownRequestId(u64),

    /// Request session ended with fewer than two timestamps
    #[error("incomplete session for request id {id}: {observed} timestamp(s), need 2")]
    IncompleteSession { id: u64, observed: usize },

    /// Request id has no entry in the arrival-time file
    #[error("no arrival time recorded for request id {id} ({available} entries loaded)")]
    MissingArrivalTime { id: u64, available: usize },

    // ========== Data Errors ==========
    /// Statistic requested over a series with no samples
    #[error("no samples collected for {0}")]
    EmptySeries(&'static str),

    /// Throughput denominator is zero or was never observed
    #[error("cannot compute throughput: {0}")]
    ZeroWallClock(&'static str),

    // ========== Configuration Errors ==========
    /// Invalid analyzer configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    // ========== I/O Errors ==========
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Arrival-time file contained a non-numeric line
    #[error("arrival-time file line {line} is not a number: {content:?}")]
    InvalidArrivalLine { line: usize, content: String },
}

/// Result type used throughout the crate
pub type ForgeResult<T> = Result<T, LogForgeError>;

/// Error category, used for reporting and exit-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Corrupted log or reconstruction bug; the run cannot continue
    Consistency,
    /// The log parsed cleanly but yielded no usable samples
    Data,
    /// The analyzer was configured with invalid settings
    Config,
    /// File system failure
    Io,
}

impl LogForgeError {
    /// Categorize this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            LogForgeError::UnknownRequestId(_)
            | LogForgeError::IncompleteSession { .. }
            | LogForgeError::MissingArrivalTime { .. } => ErrorCategory::Consistency,
            LogForgeError::EmptySeries(_) | LogForgeError::ZeroWallClock(_) => ErrorCategory::Data,
            LogForgeError::InvalidConfiguration(_) => ErrorCategory::Config,
            LogForgeError::IoError(_) | LogForgeError::InvalidArrivalLine { .. } => {
                ErrorCategory::Io
            }
        }
    }
}
