//! Session and batch reconstruction
//!
//! Folds the ordered event stream of one log file into per-request sessions
//! and per-batch records. All accumulating state lives in explicit
//! reconstruction structs so a fold can be driven and inspected in isolation;
//! there are no ambient globals.
//!
//! The two dialects reconstruct differently:
//! - fast: flat series in encounter order, no request keying
//! - flex: a per-request state machine keyed by request id

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ForgeResult, LogForgeError};
use crate::event::LogEvent;
use crate::parser::{fast, flex};

/// One scheduler batch-advance observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRecord {
    pub batch: u64,
    pub timestamp: f64,
}

/// Timeline of one request, filled in two phases.
///
/// The first entry is the absolute arrival instant; the second is whichever
/// comes first of a re-dispatch observation or the completion timestamp.
/// Latency is always taken from the first two entries.
#[derive(Debug, Clone, Default)]
pub struct RequestSession {
    timestamps: Vec<f64>,
}

impl RequestSession {
    /// End-to-end latency in milliseconds.
    ///
    /// Fails if the session never accumulated a second timestamp; that means
    /// the log ended mid-request and the sample would be garbage.
    pub fn latency_ms(&self, id: u64) -> ForgeResult<f64> {
        if self.timestamps.len() < 2 {
            return Err(LogForgeError::IncompleteSession {
                id,
                observed: self.timestamps.len(),
            });
        }
        Ok((self.timestamps[1] - self.timestamps[0]) * 1000.0)
    }

    /// Raw timestamps in observation order
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }
}

/// Request arrival offsets loaded from the arrival-time side file.
///
/// One float per line, indexed by request id, recorded in milliseconds and
/// converted to seconds at load time.
#[derive(Debug, Clone, Default)]
pub struct ArrivalTimes {
    seconds: Vec<f64>,
}

impl ArrivalTimes {
    /// Parse arrival times from file contents.
    pub fn parse(contents: &str) -> ForgeResult<Self> {
        let mut seconds = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let ms: f64 = line
                .parse()
                .map_err(|_| LogForgeError::InvalidArrivalLine {
                    line: idx + 1,
                    content: line.to_string(),
                })?;
            seconds.push(ms / 1000.0);
        }
        Ok(ArrivalTimes { seconds })
    }

    /// Load arrival times from a file path.
    pub fn load(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Arrival offset for a request id, in seconds.
    pub fn seconds(&self, id: u64) -> ForgeResult<f64> {
        self.seconds
            .get(id as usize)
            .copied()
            .ok_or(LogForgeError::MissingArrivalTime {
                id,
                available: self.seconds.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }
}

/// Reconstruction state for the continuous-batching dialect
#[derive(Debug)]
pub struct FlexReconstructor {
    arrivals: ArrivalTimes,
    sessions: HashMap<u64, RequestSession>,
    /// Request ids in first-observation order; the session map alone loses it
    order: Vec<u64>,
    batches: Vec<BatchRecord>,
    input_lengths: Vec<u64>,
    final_lengths: Vec<u64>,
    batch_sizes: Vec<u64>,
    /// Minimum `NewRequest` timestamp seen so far; only ever decreases
    baseline: f64,
    elapsed_seconds: f64,
}

/// Wall-clock total assumed when the log carries no `ELAPSED` record
const DEFAULT_ELAPSED_SECONDS: f64 = 100.0;

impl FlexReconstructor {
    pub fn new(arrivals: ArrivalTimes) -> Self {
        FlexReconstructor {
            arrivals,
            sessions: HashMap::new(),
            order: Vec::new(),
            batches: Vec::new(),
            input_lengths: Vec::new(),
            final_lengths: Vec::new(),
            batch_sizes: Vec::new(),
            baseline: 0.0,
            elapsed_seconds: DEFAULT_ELAPSED_SECONDS,
        }
    }

    /// Fold one classified event into the reconstruction state.
    ///
    /// A completion for an id that never arrived aborts the run: either the
    /// log is corrupted or the reconstruction is wrong, and partial results
    /// would be misleading either way.
    pub fn observe(&mut self, event: &LogEvent) -> ForgeResult<()> {
        match *event {
            LogEvent::NewRequest {
                id,
                timestamp,
                input_len,
            } => {
                if let Some(session) = self.sessions.get_mut(&id) {
                    // Re-observed at dispatch time: run-relative offset.
                    session.timestamps.push(timestamp - self.baseline);
                } else {
                    self.baseline = self.baseline.min(timestamp);
                    let arrival = self.arrivals.seconds(id)? + self.baseline;
                    self.sessions.insert(
                        id,
                        RequestSession {
                            timestamps: vec![arrival],
                        },
                    );
                    self.order.push(id);
                }
                self.input_lengths.push(input_len);
            }
            LogEvent::RequestDone {
                id,
                timestamp,
                output_len,
            } => {
                let session = self
                    .sessions
                    .get_mut(&id)
                    .ok_or(LogForgeError::UnknownRequestId(id))?;
                session.timestamps.push(timestamp);
                self.final_lengths.push(output_len);
            }
            LogEvent::NextBatch { batch, timestamp } => {
                self.batches.push(BatchRecord { batch, timestamp });
            }
            LogEvent::BatchConfig { size } => {
                self.batch_sizes.push(size);
            }
            LogEvent::Elapsed { seconds } => {
                // Last writer wins.
                self.elapsed_seconds = seconds;
            }
            // Fast-dialect events; nothing to fold here.
            _ => {}
        }
        Ok(())
    }

    /// Finalize the fold into a queryable timeline.
    ///
    /// `num_gpu` is the number of parallel execution lanes: batch `i` and
    /// batch `i - num_gpu` run on the same lane, so their timestamp delta
    /// approximates that lane's kernel duration. `stride` downsamples the
    /// batch-size samples, which are logged once per scheduling tick.
    pub fn finish(self, num_gpu: usize, stride: usize) -> ForgeResult<FlexTimeline> {
        let mut latencies_ms = Vec::with_capacity(self.order.len());
        for &id in &self.order {
            let session = &self.sessions[&id];
            latencies_ms.push((id, session.latency_ms(id)?));
        }

        let mut kernel_ms = Vec::new();
        for i in num_gpu..self.batches.len() {
            let delta = self.batches[i].timestamp - self.batches[i - num_gpu].timestamp;
            kernel_ms.push(delta * 1000.0);
        }

        Ok(FlexTimeline {
            latencies_ms,
            kernel_ms,
            batch_sizes: downsample(&self.batch_sizes, stride),
            input_lengths: self.input_lengths,
            final_lengths: self.final_lengths,
            elapsed_seconds: self.elapsed_seconds,
        })
    }
}

/// Finalized flex reconstruction
#[derive(Debug, Clone)]
pub struct FlexTimeline {
    /// `(request id, latency ms)` in request-arrival order
    pub latencies_ms: Vec<(u64, f64)>,
    /// Per-lane kernel durations in ms; length is `max(0, batches - num_gpu)`
    pub kernel_ms: Vec<f64>,
    /// Batch-size samples after stride downsampling
    pub batch_sizes: Vec<u64>,
    /// Input token length per dispatch observation
    pub input_lengths: Vec<u64>,
    /// Final token length per completed request
    pub final_lengths: Vec<u64>,
    /// Wall-clock total for the run, seconds
    pub elapsed_seconds: f64,
}

impl FlexTimeline {
    pub fn total_requests(&self) -> usize {
        self.latencies_ms.len()
    }

    /// Net tokens generated across the run
    pub fn tokens_generated(&self) -> i64 {
        let finals: i64 = self.final_lengths.iter().map(|&v| v as i64).sum();
        let inputs: i64 = self.input_lengths.iter().map(|&v| v as i64).sum();
        finals - inputs
    }
}

/// Keep every `stride`-th element starting at index 0.
pub fn downsample<T: Copy>(samples: &[T], stride: usize) -> Vec<T> {
    if stride <= 1 {
        return samples.to_vec();
    }
    samples.iter().step_by(stride).copied().collect()
}

/// Finalized fast reconstruction
#[derive(Debug, Clone, Default)]
pub struct FastTimeline {
    /// Kernel durations in encounter order, native log unit
    pub kernel_times: Vec<f64>,
    /// End-to-end latencies in ms, encounter order
    pub latencies_ms: Vec<f64>,
    /// Approximate input token lengths, from context-line character counts
    pub input_token_lengths: Vec<f64>,
    /// Largest running-total wall clock observed, seconds
    pub max_total_time: f64,
    /// Largest running token count observed
    pub max_token_count: u64,
}

/// Scan fast-dialect log lines into a [`FastTimeline`].
///
/// This walks the raw lines rather than a pre-classified event stream because
/// `[Context]` and `[Output]` markers consume the following raw line: the
/// context text's character count approximates its token count (divided by
/// `chars_per_token`), and output text is skipped without being retained.
pub fn scan_fast(lines: &[String], chars_per_token: f64) -> FastTimeline {
    let mut timeline = FastTimeline::default();
    let mut i = 0;
    while i < lines.len() {
        match fast::classify(&lines[i]) {
            Some(LogEvent::KernelTime { duration }) => timeline.kernel_times.push(duration),
            Some(LogEvent::ContextMarker) => {
                i += 1;
                if let Some(context) = lines.get(i) {
                    timeline
                        .input_token_lengths
                        .push(context.chars().count() as f64 / chars_per_token);
                }
            }
            Some(LogEvent::OutputMarker) => {
                // Generated text is not retained.
                i += 1;
            }
            Some(LogEvent::Latency { ms }) => timeline.latencies_ms.push(ms),
            Some(LogEvent::TotalTime { seconds }) => {
                timeline.max_total_time = timeline.max_total_time.max(seconds);
            }
            Some(LogEvent::TokenCount { count }) => {
                timeline.max_token_count = timeline.max_token_count.max(count);
            }
            _ => {}
        }
        i += 1;
    }
    timeline
}

/// Drive a [`FlexReconstructor`] over raw flex-dialect lines.
pub fn scan_flex(lines: &[String], arrivals: ArrivalTimes) -> ForgeResult<FlexReconstructor> {
    let mut reconstructor = FlexReconstructor::new(arrivals);
    for line in lines {
        if let Some(event) = flex::classify(line) {
            reconstructor.observe(&event)?;
        }
    }
    Ok(reconstructor)
}
