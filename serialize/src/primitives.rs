//! String-level primitives shared by the built-in codecs.
//!
//! Everything here is total: malformed input yields `NaN` or `None`, never a
//! panic or an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Formats a number the way a browser's `String(number)` does.
///
/// Integers have no fraction, `-0` prints as `0`, non-finite values print as
/// `NaN` / `Infinity` / `-Infinity`, and very large or very small magnitudes
/// use exponent notation (`1e+21`, `1e-7`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

/// Parses a number with unary-plus semantics.
///
/// Surrounding whitespace is ignored, blank text is `0`, `0x`/`0o`/`0b`
/// prefixes are honoured and anything else that is not a decimal literal is
/// `NaN`.
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(value) = parse_prefixed_integer(trimmed) {
        return value;
    }
    let is_decimal_literal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[allow(clippy::cast_precision_loss)]
fn parse_prefixed_integer(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    Some(
        u64::from_str_radix(&text[2..], radix)
            .map(|value| value as f64)
            .unwrap_or(f64::NAN),
    )
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into a calendar date.
///
/// Missing month and day default to January and the 1st, so a bare year is
/// the first day of that year regardless of the local time zone. Out-of-range
/// fields are rejected rather than rolled over.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let year = parse_date_field::<i32>(parts.next()?)?;
    let month = match parts.next() {
        Some(part) => parse_date_field::<u32>(part)?,
        None => 1,
    };
    let day = match parts.next() {
        Some(part) => parse_date_field::<u32>(part)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_date_field<T: std::str::FromStr>(part: &str) -> Option<T> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Formats an instant as ISO-8601 UTC with millisecond precision.
#[must_use]
pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a date-time in any of the common textual forms.
///
/// RFC 3339 and RFC 2822 carry their own offset; zone-less date-times are
/// read as local wall time; date-only forms are UTC midnight.
#[must_use]
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.with_timezone(&Utc));
    }
    if let Ok(value) = DateTime::parse_from_rfc2822(text) {
        return Some(value.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|value| value.with_timezone(&Utc));
        }
    }
    let midnight = parse_date(text)?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight))
}

/// Splits a delimited list. An empty input is an empty list; empty segments
/// are kept so positions line up with the encoded form.
#[must_use]
pub fn split_delimited<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split(separator).collect()
}

/// Splits an object entry on the first key/value separator.
#[must_use]
pub fn split_entry<'a>(entry: &'a str, separator: &str) -> (&'a str, Option<&'a str>) {
    match entry.split_once(separator) {
        Some((key, value)) => (key, Some(value)),
        None => (entry, None),
    }
}
