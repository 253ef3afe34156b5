//! Integer-cent money handling.
//!
//! All balances and amounts inside the core are `i64` minor units. Decimal
//! values appear only at the edges: entry forms submit decimal amounts, and
//! reports may render cents back as decimal strings. Conversion happens
//! exactly once per boundary crossing so rounding can never compound.

use crate::errors::ValidationError;

/// Signed amount in minor units (cents).
pub type Cents = i64;

pub const CENTS_PER_UNIT: Cents = 100;

/// Largest decimal magnitude accepted at the boundary. Inputs beyond this
/// would lose integer precision in an `f64` before conversion.
const MAX_DECIMAL_MAGNITUDE: f64 = 70_000_000_000_000.0;

/// Converts a decimal currency value to cents, rounding half away from zero.
///
/// `42.50` becomes `4250`; `0.005` becomes `1`. Values smaller than half a
/// cent collapse to `0`, which amount validation then rejects.
pub fn from_decimal(value: f64) -> Result<Cents, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::AmountNotFinite);
    }
    if value.abs() > MAX_DECIMAL_MAGNITUDE {
        return Err(ValidationError::AmountOutOfRange);
    }
    Ok((value * CENTS_PER_UNIT as f64).round() as Cents)
}

/// Parses a plain decimal string (`"12.34"`, `"-0.5"`, `".99"`) into cents.
///
/// At most two fraction digits are accepted; this path is exact and never
/// rounds. Grouping separators and currency symbols are not supported.
pub fn from_decimal_str(text: &str) -> Result<Cents, ValidationError> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(ValidationError::AmountMalformed);
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::AmountMalformed);
    }
    if fraction.len() > 2 {
        return Err(ValidationError::AmountPrecision);
    }
    let units: Cents = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ValidationError::AmountOutOfRange)?
    };
    let mut cents_fraction: Cents = fraction.parse().unwrap_or(0);
    if fraction.len() == 1 {
        cents_fraction *= 10;
    }
    let magnitude = units
        .checked_mul(CENTS_PER_UNIT)
        .and_then(|base| base.checked_add(cents_fraction))
        .ok_or(ValidationError::AmountOutOfRange)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Renders cents as a plain decimal string with two fraction digits.
pub fn to_decimal_string(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!(
        "{}{}.{:02}",
        sign,
        magnitude / CENTS_PER_UNIT as u64,
        magnitude % CENTS_PER_UNIT as u64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_common_amounts() {
        assert_eq!(from_decimal(42.50), Ok(4250));
        assert_eq!(from_decimal(0.01), Ok(1));
        assert_eq!(from_decimal(1000.0), Ok(100_000));
        assert_eq!(from_decimal(19.99), Ok(1999));
    }

    #[test]
    fn rounds_half_cents_away_from_zero() {
        assert_eq!(from_decimal(0.005), Ok(1));
        assert_eq!(from_decimal(-0.005), Ok(-1));
        assert_eq!(from_decimal(0.125), Ok(13));
    }

    #[test]
    fn sub_half_cent_collapses_to_zero() {
        assert_eq!(from_decimal(0.004), Ok(0));
        assert_eq!(from_decimal(0.0), Ok(0));
    }

    #[test]
    fn rejects_non_finite_and_oversized_values() {
        assert_eq!(from_decimal(f64::NAN), Err(ValidationError::AmountNotFinite));
        assert_eq!(
            from_decimal(f64::INFINITY),
            Err(ValidationError::AmountNotFinite)
        );
        assert_eq!(from_decimal(1e18), Err(ValidationError::AmountOutOfRange));
    }

    #[test]
    fn parses_decimal_strings_exactly() {
        assert_eq!(from_decimal_str("12.34"), Ok(1234));
        assert_eq!(from_decimal_str("12.3"), Ok(1230));
        assert_eq!(from_decimal_str("12"), Ok(1200));
        assert_eq!(from_decimal_str(".99"), Ok(99));
        assert_eq!(from_decimal_str("-0.50"), Ok(-50));
        assert_eq!(from_decimal_str(" 7.25 "), Ok(725));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(from_decimal_str(""), Err(ValidationError::AmountMalformed));
        assert_eq!(from_decimal_str("."), Err(ValidationError::AmountMalformed));
        assert_eq!(
            from_decimal_str("12.345"),
            Err(ValidationError::AmountPrecision)
        );
        assert_eq!(
            from_decimal_str("1,200.00"),
            Err(ValidationError::AmountMalformed)
        );
        assert_eq!(
            from_decimal_str("$5.00"),
            Err(ValidationError::AmountMalformed)
        );
    }

    #[test]
    fn renders_cents_as_decimal() {
        assert_eq!(to_decimal_string(4250), "42.50");
        assert_eq!(to_decimal_string(-50), "-0.50");
        assert_eq!(to_decimal_string(0), "0.00");
        assert_eq!(to_decimal_string(100_000), "1000.00");
        assert_eq!(to_decimal_string(7), "0.07");
    }

    #[test]
    fn string_round_trip_is_exact_across_the_supported_range() {
        let samples = [
            1,
            99,
            100,
            4250,
            1_000_000,
            999_999_999,
            1_000_000_000_00,
        ];
        for cents in samples {
            let rendered = to_decimal_string(cents);
            assert_eq!(from_decimal_str(&rendered), Ok(cents), "cents={cents}");
        }
        for cents in (1..=1_000_000).step_by(997) {
            let rendered = to_decimal_string(cents);
            assert_eq!(from_decimal_str(&rendered), Ok(cents));
        }
    }
}
