//! logforge - Offline analyzer for inference-serving benchmark logs
//!
//! Parses the textual execution logs emitted by an inference-serving
//! benchmark and derives latency, throughput, and kernel-time statistics.
//! Two log dialects are supported: "fast" (fixed batching) and "flex"
//! (continuous batching).
//!
//! The pipeline is a one-way flow: raw lines are classified into tagged
//! events ([`parser`]), folded into per-request sessions and batch records
//! ([`timeline`]), summarized ([`stats`]), and emitted as CSVs plus an
//! aggregate report ([`report`]).

pub mod analyzer;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod parser;
pub mod report;
pub mod stats;
pub mod timeline;

pub use analyzer::{analyze_fast, analyze_flex, Analysis, AnalysisReport, Dialect};
pub use config::AnalyzerConfig;
pub use error::{ErrorCategory, ForgeResult, LogForgeError};
pub use event::LogEvent;
pub use stats::SeriesSummary;
