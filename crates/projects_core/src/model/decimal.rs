//! Fixed-point decimal value with two fractional digits.
//!
//! # Responsibility
//! - Represent hours and costs exactly, without binary floating point drift.
//! - Provide the canonical text form used for binding and serialization.
//!
//! # Invariants
//! - Scale is always 2; the value is stored as signed hundredths.
//! - `Display` always renders exactly two fractional digits.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const SCALE: i64 = 100;

/// Decimal number with a fixed scale of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    hundredths: i64,
}

/// Error returned when text cannot be read as a two-digit decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDecimalError {
    input: String,
    reason: &'static str,
}

impl Display for ParseDecimalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid decimal `{}`: {}", self.input, self.reason)
    }
}

impl Error for ParseDecimalError {}

impl Decimal {
    pub const ZERO: Decimal = Decimal { hundredths: 0 };

    /// Builds a decimal from a count of hundredths (`1050` is `10.50`).
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    /// Builds a decimal from a whole number.
    pub fn from_whole(value: i64) -> Option<Self> {
        value.checked_mul(SCALE).map(Self::from_hundredths)
    }

    /// Rounds a floating point value half away from zero to two digits.
    ///
    /// Returns `None` for non-finite or out-of-range input.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * SCALE as f64).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Self::from_hundredths(scaled as i64))
    }

    pub const fn hundredths(self) -> i64 {
        self.hundredths
    }

    pub const fn is_negative(self) -> bool {
        self.hundredths < 0
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        let scale = SCALE as u64;
        write!(f, "{sign}{}.{:02}", magnitude / scale, magnitude % scale)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let fail = |reason| ParseDecimalError {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(fail("no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(fail("unexpected character"));
        }
        if fraction.len() > 2 {
            return Err(fail("more than two fractional digits"));
        }

        let whole_value = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|_| fail("out of range"))?
        };
        let fraction_value = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction.parse::<i64>().map_err(|_| fail("out of range"))?,
        };

        let magnitude = whole_value
            .checked_mul(SCALE)
            .and_then(|value| value.checked_add(fraction_value))
            .ok_or_else(|| fail("out of range"))?;

        Ok(Self::from_hundredths(if negative { -magnitude } else { magnitude }))
    }
}

impl TryFrom<String> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Decimal;

    #[test]
    fn parses_common_forms() {
        assert_eq!("10".parse::<Decimal>().unwrap().hundredths(), 1000);
        assert_eq!("10.5".parse::<Decimal>().unwrap().hundredths(), 1050);
        assert_eq!("10.25".parse::<Decimal>().unwrap().hundredths(), 1025);
        assert_eq!(" .75 ".parse::<Decimal>().unwrap().hundredths(), 75);
        assert_eq!("-3.10".parse::<Decimal>().unwrap().hundredths(), -310);
    }

    #[test]
    fn rejects_excess_precision_and_garbage() {
        assert!("1.234".parse::<Decimal>().is_err());
        assert!("".parse::<Decimal>().is_err());
        assert!("-".parse::<Decimal>().is_err());
        assert!("1,5".parse::<Decimal>().is_err());
        assert!("ten".parse::<Decimal>().is_err());
    }

    #[test]
    fn display_always_renders_two_digits() {
        assert_eq!(Decimal::from_hundredths(1000).to_string(), "10.00");
        assert_eq!(Decimal::from_hundredths(5).to_string(), "0.05");
        assert_eq!(Decimal::from_hundredths(-310).to_string(), "-3.10");
        assert_eq!(Decimal::ZERO.to_string(), "0.00");
    }

    #[test]
    fn from_f64_rounds_to_hundredths() {
        assert_eq!(Decimal::from_f64(10.25).unwrap().hundredths(), 1025);
        assert_eq!(Decimal::from_f64(0.1 + 0.2).unwrap().hundredths(), 30);
        assert!(Decimal::from_f64(f64::NAN).is_none());
    }
}
