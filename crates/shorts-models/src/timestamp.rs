//! Timestamp parsing and SRT time formatting.
//!
//! Cut boundaries are configured as `MM:SS` or `HH:MM:SS` strings with
//! whole-second precision; subtitle times are rendered as `HH:MM:SS,mmm`.

use thiserror::Error;

/// Parse a cut-boundary time string to total seconds.
///
/// Supports `MM:SS` and `HH:MM:SS`. Components must be non-negative
/// integers; fractional seconds are rejected.
///
/// # Examples
/// ```
/// use shorts_models::timestamp::parse_time_string;
/// assert_eq!(parse_time_string("01:30").unwrap(), 90.0);
/// assert_eq!(parse_time_string("01:00:05").unwrap(), 3605.0);
/// ```
pub fn parse_time_string(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.len() {
        2 => {
            let minutes = parse_component("minutes", parts[0])?;
            let seconds = parse_component("seconds", parts[1])?;
            Ok((minutes * 60 + seconds) as f64)
        }
        3 => {
            let hours = parse_component("hours", parts[0])?;
            let minutes = parse_component("minutes", parts[1])?;
            let seconds = parse_component("seconds", parts[2])?;
            Ok((hours * 3600 + minutes * 60 + seconds) as f64)
        }
        _ => Err(TimestampError::InvalidFormat(ts.to_string())),
    }
}

fn parse_component(name: &'static str, value: &str) -> Result<u64, TimestampError> {
    value
        .parse::<u64>()
        .map_err(|_| TimestampError::InvalidValue(name, value.to_string()))
}

/// Format seconds as an SRT timestamp: `HH:MM:SS,mmm`.
///
/// Hours are zero-padded but unbounded, milliseconds are rounded.
pub fn format_srt_time(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) back to seconds.
pub fn parse_srt_time(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    let (hms, millis) = ts
        .split_once(',')
        .ok_or_else(|| TimestampError::InvalidFormat(ts.to_string()))?;

    let parts: Vec<&str> = hms.split(':').collect();
    if parts.len() != 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let hours = parse_component("hours", parts[0])?;
    let minutes = parse_component("minutes", parts[1])?;
    let seconds = parse_component("seconds", parts[2])?;
    let millis = parse_component("milliseconds", millis)?;

    Ok((hours * 3600 + minutes * 60 + seconds) as f64 + millis as f64 / 1000.0)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("timestamp cannot be empty")]
    Empty,

    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),

    #[error("invalid timestamp format '{0}', use MM:SS or HH:MM:SS")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mm_ss() {
        assert_eq!(parse_time_string("00:00").unwrap(), 0.0);
        assert_eq!(parse_time_string("05:30").unwrap(), 330.0);
        assert_eq!(parse_time_string("53:53").unwrap(), 3233.0);
    }

    #[test]
    fn test_parse_hh_mm_ss() {
        assert_eq!(parse_time_string("00:01:00").unwrap(), 60.0);
        assert_eq!(parse_time_string("01:30:45").unwrap(), 5445.0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(parse_time_string(""), Err(TimestampError::Empty)));
        assert!(matches!(
            parse_time_string("90"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_time_string("1:2:3:4"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_time_string("ab:cd"),
            Err(TimestampError::InvalidValue(_, _))
        ));
        // No fractional seconds, no negatives
        assert!(parse_time_string("00:10.5").is_err());
        assert!(parse_time_string("-1:30").is_err());
    }

    #[test]
    fn test_format_srt_time() {
        assert_eq!(format_srt_time(0.0), "00:00:00,000");
        assert_eq!(format_srt_time(1.5), "00:00:01,500");
        assert_eq!(format_srt_time(3661.25), "01:01:01,250");
        // Unbounded hours
        assert_eq!(format_srt_time(360000.0), "100:00:00,000");
    }

    #[test]
    fn test_srt_time_round_trip() {
        for secs in [0.0, 0.001, 1.5, 59.999, 3661.25, 86400.5] {
            let formatted = format_srt_time(secs);
            let parsed = parse_srt_time(&formatted).unwrap();
            assert!((parsed - secs).abs() < 0.001, "{} -> {}", secs, formatted);
        }
    }

    #[test]
    fn test_parse_srt_time_rejects_bad_input() {
        assert!(parse_srt_time("00:00:00").is_err());
        assert!(parse_srt_time("00:00,000").is_err());
        assert!(parse_srt_time("aa:bb:cc,ddd").is_err());
    }
}
