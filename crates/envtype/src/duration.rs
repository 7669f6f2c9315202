//! Duration literal parsing.
//!
//! A duration literal is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix, such as `300ms`, `1.5h` or `2h45m`.
//! The bare literal `0` is also accepted.
//!
//! | Unit | Meaning |
//! |------|---------|
//! | `ns` | nanoseconds |
//! | `us`, `µs`, `μs` | microseconds |
//! | `ms` | milliseconds |
//! | `s` | seconds |
//! | `m` | minutes |
//! | `h` | hours |
//!
//! Values are parsed into [`std::time::Duration`], which is unsigned, so a
//! leading `-` is rejected unless the total is zero (`-0s`). A leading `+`
//! is allowed.

use std::time::Duration;

use thiserror::Error as ThisError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Largest nanosecond count representable by [`Duration`].
const MAX_NANOS: u128 = (u64::MAX as u128) * NANOS_PER_SEC + (NANOS_PER_SEC - 1);

/// Fraction digits past this scale are truncated.
const MAX_FRACTION_SCALE: u128 = 10u128.pow(20);

/// Errors produced by [`parse_duration`].
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DurationError {
    /// The literal was empty (or only a sign).
    #[error("empty duration")]
    Empty,

    /// The literal started with `-` and was not zero.
    #[error("negative durations are not supported")]
    Negative,

    /// A component had no digits before its unit.
    #[error("expected a number at byte {offset}")]
    InvalidNumber {
        /// Byte offset of the offending component.
        offset: usize,
    },

    /// A number was not followed by a unit.
    #[error("missing unit after number at byte {offset}")]
    MissingUnit {
        /// Byte offset where the unit was expected.
        offset: usize,
    },

    /// The unit suffix is not one of the supported units.
    #[error("unknown unit {unit:?}")]
    UnknownUnit {
        /// The unrecognized unit text.
        unit: String,
    },

    /// The total does not fit in a [`Duration`].
    #[error("duration out of range")]
    Overflow,
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a duration literal such as `1h30m` or `500ms`.
///
/// # Errors
///
/// Returns a [`DurationError`] when the literal is empty, negative,
/// malformed, uses an unknown unit, or overflows [`Duration`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use envtype::parse_duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(90 * 60));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total: u128 = 0;

    while !rest.is_empty() {
        let offset = input.len() - rest.len();

        // Integer part
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);

        // Fraction part
        let (frac_digits, after_num) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(DurationError::InvalidNumber { offset });
        }

        // Unit runs until the next digit or '.'
        let unit_len = after_num
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_num.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit {
                offset: input.len() - after_num.len(),
            });
        }
        let (unit, remaining) = after_num.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
        })?;

        let whole = int_digits.bytes().try_fold(0u128, |acc, b| {
            acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
        });
        let mut nanos = whole
            .and_then(|w| w.checked_mul(scale))
            .ok_or(DurationError::Overflow)?;

        let (mut frac, mut frac_scale) = (0u128, 1u128);
        for b in frac_digits.bytes() {
            if frac_scale >= MAX_FRACTION_SCALE {
                break;
            }
            frac = frac * 10 + u128::from(b - b'0');
            frac_scale *= 10;
        }
        if frac > 0 {
            // frac < frac_scale <= 10^20 and scale <= 3.6 * 10^12
            nanos = nanos
                .checked_add(frac * scale / frac_scale)
                .ok_or(DurationError::Overflow)?;
        }

        total = total.checked_add(nanos).ok_or(DurationError::Overflow)?;
        if total > MAX_NANOS {
            return Err(DurationError::Overflow);
        }

        rest = remaining;
    }

    // -0 is still zero
    if negative && total != 0 {
        return Err(DurationError::Negative);
    }

    #[allow(clippy::cast_possible_truncation, reason = "bounded by MAX_NANOS")]
    let secs = (total / NANOS_PER_SEC) as u64;
    #[allow(clippy::cast_possible_truncation, reason = "remainder is below 10^9")]
    let nanos = (total % NANOS_PER_SEC) as u32;

    Ok(Duration::new(secs, nanos))
}
