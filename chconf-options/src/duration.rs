//! Duration strings such as `"300ms"`, `"1.5h"` or `"2h45m"`.
//!
//! A duration is an optional sign followed by one or more terms, each a
//! decimal number (optionally with a fraction) and a unit suffix. Valid units
//! are `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`. The bare string `"0"`
//! needs no unit.

use std::time::Duration;

use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// Error returned when a duration string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The input is empty or has no number where one was expected.
    #[error("invalid duration \"{0}\"")]
    Invalid(String),

    /// A number was not followed by a unit.
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),

    /// A unit suffix was not recognized.
    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit {
        /// The unrecognized unit.
        unit: String,
        /// The full input.
        input: String,
    },

    /// The value does not fit in 64 bits of nanoseconds.
    #[error("duration \"{0}\" is out of range")]
    Overflow(String),

    /// The value is below zero.
    #[error("negative duration \"{0}\"")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Splits the leading ASCII digits off `s`.
fn leading_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Parse a duration string.
///
/// ```rust
/// use std::time::Duration;
/// use chconf_options::duration::parse_duration;
///
/// assert_eq!(parse_duration("200ms").unwrap(), Duration::from_millis(200));
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert!(parse_duration("bad").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, after) = leading_digits(rest);
        rest = after;
        let mut value: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, after) = leading_digits(after_dot);
            fraction = digits;
            rest = after;
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after) = rest.split_at(unit_end);
        rest = after;
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        value = value.checked_mul(scale).ok_or_else(overflow)?;

        if !fraction.is_empty() {
            // Digits beyond nanosecond precision cannot change the result.
            let significant = &fraction[..fraction.len().min(19)];
            let numerator: u128 = significant.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(significant.len() as u32);
            let extra = u64::try_from(numerator * u128::from(scale) / denominator)
                .map_err(|_| overflow())?;
            value = value.checked_add(extra).ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
    }

    if negative && total > 0 {
        return Err(DurationError::Negative(input.to_string()));
    }

    Ok(Duration::from_nanos(total))
}
