//! The fixed instant pattern used by the structured side of the codec.
//!
//! Instants look like `2024-01-10T09:00:00.000Z`. The trailing `Z` is a literal
//! label only: values are offset-naive and are never converted to or from real UTC.
//! Callers already treat these strings as UTC-labeled wall-clock times, so the codec
//! keeps that contract instead of attempting timezone correctness.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CodecError, CodecResult};

/// chrono pattern for `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`.
pub const MOMENT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const MOMENT_LEN: usize = "yyyy-MM-ddTHH:mm:ss.SSSZ".len();

/// Parse a moment string.
///
/// The layout is checked byte by byte before handing off to chrono, which on its
/// own accepts a missing fraction and wider years.
pub fn parse(text: &str) -> CodecResult<NaiveDateTime> {
    let bytes = text.as_bytes();
    if bytes.len() != MOMENT_LEN {
        return Err(CodecError::malformed_timestamp(
            text,
            format!("expected {} characters, got {}", MOMENT_LEN, bytes.len()),
        ));
    }

    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'.',
            23 => *b == b'Z',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return Err(CodecError::malformed_timestamp(
                text,
                format!("unexpected character at position {}", i),
            ));
        }
    }

    NaiveDateTime::parse_from_str(text, MOMENT_FORMAT)
        .map_err(|e| CodecError::malformed_timestamp(text, e.to_string()))
}

/// Format an instant, always with millisecond precision and the `Z` label.
pub fn format(instant: &NaiveDateTime) -> String {
    instant.format(MOMENT_FORMAT).to_string()
}

/// Same calendar day at 00:00:00.000.
///
/// Rebuilt from the explicit year/month/day fields; no offset is applied.
pub fn to_midnight(instant: &NaiveDateTime) -> NaiveDateTime {
    let (year, month, day) = (instant.year(), instant.month(), instant.day());
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| instant.date())
        .and_time(NaiveTime::MIN)
}
