use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

const NANOS_DIGITS: usize = 9;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Decode a legacy `"[-]<seconds>.<fraction>"` date. The fraction has up to
/// nine digits and is right-padded to nanoseconds, so `"1.5"` is 1 s + 500 ms
/// and `"-0.5"` is half a second before the epoch. Anything else is a decode
/// error.
pub fn decode_legacy_date(value: &str) -> Result<DateTime<Utc>> {
    let (negative, magnitude) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (seconds, fraction) = magnitude.split_once('.').unwrap_or((magnitude, ""));

    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::decode(format!("invalid date {:?}", value)));
    }
    if fraction.len() > NANOS_DIGITS || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::decode(format!("invalid date fraction {:?}", value)));
    }

    let seconds: i64 = seconds
        .parse()
        .map_err(|e| Error::decode(format!("invalid date {:?}: {}", value, e)))?;
    let nanos: u32 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = NANOS_DIGITS)
            .parse()
            .map_err(|e| Error::decode(format!("invalid date {:?}: {}", value, e)))?
    };

    // -s.f is (-s - 1) seconds plus (1 - f)
    let (seconds, nanos) = match (negative, nanos) {
        (false, _) => (seconds, nanos),
        (true, 0) => (-seconds, 0),
        (true, _) => (-seconds - 1, NANOS_PER_SECOND - nanos),
    };

    DateTime::from_timestamp(seconds, nanos)
        .ok_or_else(|| Error::decode(format!("date out of range {:?}", value)))
}

/// Encode an instant the way the legacy api expects: signed seconds with nine
/// fractional digits, the fraction counted away from the epoch.
pub fn encode_legacy_date(time: DateTime<Utc>) -> String {
    let seconds = time.timestamp();
    let nanos = time.timestamp_subsec_nanos();
    if seconds < 0 && nanos > 0 {
        format!("-{}.{:09}", -(seconds + 1), NANOS_PER_SECOND - nanos)
    } else {
        format!("{}.{:09}", seconds, nanos)
    }
}

/// Decode a Simperium float date (seconds since the epoch with a microsecond
/// fraction). The fraction is rounded to whole microseconds.
pub fn decode_float_date(value: f64) -> Result<DateTime<Utc>> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::decode(format!("invalid date {}", value)));
    }

    let whole = value.floor();
    let mut seconds = whole as i64;
    let mut micros = ((value - whole) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        seconds += 1;
        micros -= 1_000_000;
    }

    DateTime::from_timestamp(seconds, micros * 1_000)
        .ok_or_else(|| Error::decode(format!("date out of range {}", value)))
}
