//! Analyzer configuration
//!
//! Builder-style configuration for one analysis run, validated before the
//! pipeline starts so bad settings fail fast with a configuration error
//! instead of surfacing as confusing arithmetic mid-run.

use std::path::{Path, PathBuf};

use crate::error::{ForgeResult, LogForgeError};

/// Default stride for downsampling batch-size samples
pub const DEFAULT_STRIDE: usize = 3;

/// Default arrival-time side file, one millisecond value per request id
pub const DEFAULT_ARRIVAL_FILE: &str = "arrival_times.txt";

/// Default characters-per-token ratio for approximating context length
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Configuration for one analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Path to the benchmark log file
    pub input: PathBuf,
    /// Number of parallel execution lanes (GPUs) in the run being analyzed
    pub num_gpu: usize,
    /// Keep every `stride`-th batch-size sample (flex only)
    pub stride: usize,
    /// Arrival-time side file (flex only)
    pub arrival_path: PathBuf,
    /// Characters-per-token conversion ratio for context lines (fast only)
    pub chars_per_token: f64,
}

impl AnalyzerConfig {
    /// Create a configuration for the given log file and lane count.
    pub fn new(input: impl AsRef<Path>, num_gpu: usize) -> Self {
        AnalyzerConfig {
            input: input.as_ref().to_path_buf(),
            num_gpu,
            stride: DEFAULT_STRIDE,
            arrival_path: PathBuf::from(DEFAULT_ARRIVAL_FILE),
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }

    /// Set the batch-size downsampling stride.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Set the arrival-time file path.
    pub fn with_arrival_path(mut self, path: impl AsRef<Path>) -> Self {
        self.arrival_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the characters-per-token conversion ratio.
    pub fn with_chars_per_token(mut self, ratio: f64) -> Self {
        self.chars_per_token = ratio;
        self
    }

    /// Directory the per-record CSVs are written into: the input file's
    /// name with its extension dropped, as a sibling of the input.
    pub fn output_dir(&self) -> PathBuf {
        self.input.with_extension("")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.input.as_os_str().is_empty() {
            return Err(LogForgeError::InvalidConfiguration(
                "input path cannot be empty".to_string(),
            ));
        }
        if self.num_gpu == 0 {
            return Err(LogForgeError::InvalidConfiguration(
                "num_gpu must be at least 1".to_string(),
            ));
        }
        if self.stride == 0 {
            return Err(LogForgeError::InvalidConfiguration(
                "stride must be at least 1".to_string(),
            ));
        }
        if !(self.chars_per_token > 0.0) {
            return Err(LogForgeError::InvalidConfiguration(format!(
                "chars_per_token must be positive, got {}",
                self.chars_per_token
            )));
        }
        Ok(())
    }
}
