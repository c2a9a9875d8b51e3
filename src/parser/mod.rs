//! Log-line classifiers
//!
//! Each serving backend writes a different log dialect. A classifier maps one
//! raw line to `Option<LogEvent>`: `Some` for a recognized event, `None` for
//! anything else. Classifiers never fail; a malformed field in an otherwise
//! recognized line shape simply yields `None` and the line is skipped.
//!
//! - [`fast`]: the fixed-batching backend (`[INFO]`/`[latency]` markers)
//! - [`flex`]: the continuous-batching backend (positional `[NewRequest]`,
//!   `[Done]`, `[NextBatch]` records with `key=value` fields)

pub mod fast;
pub mod flex;

/// Strip delimiters from a `key=value` token and parse the value.
///
/// Flex-dialect records wrap their fields in brackets and punctuation, e.g.
/// `(id=17,` or `[input_len=512]`. Rather than slicing fixed character
/// offsets, take everything after the `=` and trim any non-numeric
/// decoration from both ends.
pub(crate) fn field_value(token: &str) -> Option<&str> {
    let (_, raw) = token.split_once('=')?;
    let trimmed = raw.trim_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parse a numeric token that may carry a trailing unit suffix (`12.5ms`).
pub(crate) fn numeric_prefix(token: &str) -> Option<&str> {
    let trimmed = token.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_strips_decoration() {
        assert_eq!(field_value("(id=17,"), Some("17"));
        assert_eq!(field_value("[input_len=512]"), Some("512"));
        assert_eq!(field_value("ts=-3.25,"), Some("-3.25"));
    }

    #[test]
    fn test_field_value_rejects_malformed() {
        assert_eq!(field_value("no-equals-sign"), None);
        assert_eq!(field_value("id=,"), None);
        assert_eq!(field_value(""), None);
    }

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(numeric_prefix("12.5ms"), Some("12.5"));
        assert_eq!(numeric_prefix("42"), Some("42"));
        assert_eq!(numeric_prefix("ms"), None);
    }
}
