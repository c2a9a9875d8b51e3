//! Classified log events
//!
//! One log line maps to at most one [`LogEvent`]. Lines that match no known
//! shape produce no event and are skipped by the caller. Every variant
//! carries typed, named fields so downstream code never unpacks positional
//! tuples.

/// A single classified event from a benchmark log
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    /// Measured compute-kernel duration, in the log's native time unit
    KernelTime { duration: f64 },

    /// The next raw line is the input context string; consume it once
    ContextMarker,

    /// The next raw line is generated output text; consume it once
    OutputMarker,

    /// End-to-end request latency, already converted to milliseconds
    Latency { ms: f64 },

    /// Running total wall-clock time in seconds; only the max is retained
    TotalTime { seconds: f64 },

    /// Running total of generated tokens; only the max is retained
    TokenCount { count: u64 },

    /// Request arrival/dispatch
    NewRequest {
        id: u64,
        timestamp: f64,
        input_len: u64,
    },

    /// Request completion, referencing a previously seen id
    RequestDone {
        id: u64,
        timestamp: f64,
        output_len: u64,
    },

    /// Scheduler batch-advance
    NextBatch { batch: u64, timestamp: f64 },

    /// Configured batch-size sample
    BatchConfig { size: u64 },

    /// Total measured wall-clock time for the whole run, in seconds
    Elapsed { seconds: f64 },
}
