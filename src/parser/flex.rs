//! Classifier for the continuous-batching ("flex") log dialect
//!
//! The flex backend prefixes every scheduler record with a timestamp block,
//! so the record tag lands at token 5 and the timestamp at token 3. Record
//! fields are `key=value` pairs wrapped in punctuation; they are extracted by
//! name, not by character offset.

use crate::event::LogEvent;
use crate::parser::{field_value, numeric_prefix};

/// Classify one line of flex-dialect log output.
pub fn classify(line: &str) -> Option<LogEvent> {
    let items: Vec<&str> = line.split_whitespace().collect();
    if items.len() < 6 {
        // Short lines carry at most a batch-size sample.
        if items.first() == Some(&"BatchConfig,") {
            let size: u64 = items.last()?.parse().ok()?;
            return Some(LogEvent::BatchConfig { size });
        }
        return None;
    }

    match items[5] {
        "[NewRequest]" => {
            let id: u64 = field_value(items.get(6)?)?.parse().ok()?;
            let input_len: u64 = field_value(items.get(7)?)?.parse().ok()?;
            let timestamp: f64 = items[3].parse().ok()?;
            Some(LogEvent::NewRequest {
                id,
                timestamp,
                input_len,
            })
        }
        "[Done]" => {
            let id: u64 = field_value(items.get(6)?)?.parse().ok()?;
            let output_len: u64 = field_value(items.get(7)?)?.parse().ok()?;
            let timestamp: f64 = items[3].parse().ok()?;
            Some(LogEvent::RequestDone {
                id,
                timestamp,
                output_len,
            })
        }
        "[NextBatch]" => {
            let batch: u64 = field_value(items.get(6)?)?.parse().ok()?;
            let timestamp: f64 = items[3].parse().ok()?;
            Some(LogEvent::NextBatch { batch, timestamp })
        }
        _ if items[0] == "ELAPSED" => {
            // Wall-clock total with a trailing unit suffix, e.g. `104.2s]`.
            let seconds: f64 = numeric_prefix(items[3])?.parse().ok()?;
            Some(LogEvent::Elapsed { seconds })
        }
        _ => None,
    }
}
