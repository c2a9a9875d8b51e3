//! Classifier for the fixed-batching ("fast") log dialect
//!
//! The fast backend logs one kernel duration per `[INFO]` line, interleaved
//! with `[Context]`/`[Output]` text markers, `[latency]` readings in seconds,
//! and running totals. Field positions are fixed by the backend's logger and
//! versioned with it; this grammar matches that output, nothing more.

use crate::event::LogEvent;

/// Classify one line of fast-dialect log output.
///
/// Returns `None` for every line that does not match a recognized shape,
/// including `[INFO]` lines whose numeric field fails to parse.
pub fn classify(line: &str) -> Option<LogEvent> {
    let items: Vec<&str> = line.split_whitespace().collect();
    match items.first()? {
        &"[INFO]" => classify_info(&items),
        &"[Context]" => Some(LogEvent::ContextMarker),
        &"[Output]" => Some(LogEvent::OutputMarker),
        &"[latency]" => {
            // Logged in seconds; the rest of the pipeline works in ms.
            let seconds: f64 = items.get(1)?.parse().ok()?;
            Some(LogEvent::Latency {
                ms: seconds * 1000.0,
            })
        }
        _ => None,
    }
}

fn classify_info(items: &[&str]) -> Option<LogEvent> {
    match (items.get(1), items.get(2)) {
        (Some(&"Total"), Some(&"time")) => {
            let seconds: f64 = items.get(4)?.parse().ok()?;
            Some(LogEvent::TotalTime { seconds })
        }
        (Some(&"Total"), Some(&"token")) => {
            let count: u64 = items.get(4)?.parse().ok()?;
            Some(LogEvent::TokenCount { count })
        }
        // Per-iteration batch chatter, known noise.
        (Some(&"batch"), _) => None,
        _ => {
            let duration: f64 = items.get(4)?.parse().ok()?;
            Some(LogEvent::KernelTime { duration })
        }
    }
}
