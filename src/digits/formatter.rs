//! Fixed-point rendering with an exact count of fractional digits.

use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::Signed;

use crate::core::precision::PrecisionContext;
use crate::digits::common::DecimalPlaces;

/// An integer part, then (for a non-zero count) a `.` and exactly
/// `decimal_places` fractional digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitString {
    text: String,
    decimal_places: u64,
}

impl DigitString {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn decimal_places(&self) -> u64 {
        self.decimal_places
    }

    pub fn integer_part(&self) -> &str {
        match self.text.find('.') {
            Some(point) => &self.text[..point],
            None => &self.text,
        }
    }

    pub fn fractional_part(&self) -> &str {
        match self.text.find('.') {
            Some(point) => &self.text[point + 1..],
            None => "",
        }
    }

    /// Characters before the first fractional digit: the integer part and,
    /// when present, the decimal point.
    pub fn prefix_len(&self) -> usize {
        self.text.len() - self.fractional_part().len()
    }

    pub fn char_count(&self) -> usize {
        self.text.len()
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Number of digits left of the decimal point in |value| (zero when |value| < 1).
fn integer_digit_count(value: &BigDecimal) -> u64 {
    let (_, scale) = value.as_bigint_and_exponent();
    (value.digits() as i64 - scale).max(0) as u64
}

/// Truncate `value` toward zero to `decimal_places` fractional digits.
///
/// The value is first rounded down under a context holding exactly the
/// integer digits plus the requested fractional digits; the text is then
/// padded with zeros (or cut) to the exact count.
pub fn format_fixed(value: &BigDecimal, decimal_places: DecimalPlaces) -> DigitString {
    let places = decimal_places.get();
    let context = PrecisionContext::truncating(integer_digit_count(value) + places);
    let truncated = context.round(value);
    DigitString {
        text: render_fixed(&truncated, places as usize),
        decimal_places: places,
    }
}

/// Plain positional notation. `BigDecimal`'s own `Display` may switch to
/// exponent notation, so the text is built from the unscaled integer.
fn render_fixed(value: &BigDecimal, places: usize) -> String {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let mut magnitude = unscaled.magnitude().to_string();

    let (integer, mut fraction) = if scale <= 0 {
        if magnitude != "0" {
            magnitude.extend(std::iter::repeat('0').take(scale.unsigned_abs() as usize));
        }
        (magnitude, String::new())
    } else {
        let scale = scale as usize;
        if magnitude.len() <= scale {
            let padding = "0".repeat(scale + 1 - magnitude.len());
            magnitude.insert_str(0, &padding);
        }
        let fraction = magnitude.split_off(magnitude.len() - scale);
        (magnitude, fraction)
    };

    // Never rounds: extra digits are cut, missing ones are zeros.
    fraction.truncate(places);
    fraction.extend(std::iter::repeat('0').take(places - fraction.len()));

    let all_zero = integer.bytes().chain(fraction.bytes()).all(|digit| digit == b'0');
    let mut text = String::with_capacity(integer.len() + places + 2);
    if unscaled.is_negative() && !all_zero {
        text.push('-');
    }
    text.push_str(&integer);
    if places > 0 {
        text.push('.');
        text.push_str(&fraction);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fixed(text: &str, places: u64) -> String {
        format_fixed(&BigDecimal::from_str(text).unwrap(), DecimalPlaces::from(places)).into_string()
    }

    #[test]
    fn test_truncates_never_rounds() {
        assert_eq!(fixed("1.41421356", 5), "1.41421");
        assert_eq!(fixed("1.99999999", 3), "1.999");
        assert_eq!(fixed("2.71828", 2), "2.71");
    }

    #[test]
    fn test_zero_places_has_no_point() {
        assert_eq!(fixed("1.41421356", 0), "1");
        assert_eq!(fixed("9.9", 0), "9");
    }

    #[test]
    fn test_pads_short_fractions() {
        assert_eq!(fixed("1.5", 4), "1.5000");
        assert_eq!(fixed("2", 3), "2.000");
        assert_eq!(fixed("1E+2", 1), "100.0");
    }

    #[test]
    fn test_sub_unit_and_negative_values() {
        assert_eq!(fixed("0.000123", 2), "0.00");
        assert_eq!(fixed("0.000123", 5), "0.00012");
        assert_eq!(fixed("-1.41421356", 3), "-1.414");
        assert_eq!(fixed("-0.0004", 2), "0.00");
        assert_eq!(fixed("0", 2), "0.00");
    }

    #[test]
    fn test_digit_string_parts() {
        let digits = format_fixed(
            &BigDecimal::from_str("12.3456").unwrap(),
            DecimalPlaces::from(3),
        );
        assert_eq!(digits.integer_part(), "12");
        assert_eq!(digits.fractional_part(), "345");
        assert_eq!(digits.prefix_len(), 3);
        assert_eq!(digits.char_count(), 6);
        assert_eq!(digits.decimal_places(), 3);
        assert_eq!(digits.to_string(), "12.345");

        let whole = format_fixed(&BigDecimal::from(7), DecimalPlaces::from(0));
        assert_eq!(whole.integer_part(), "7");
        assert_eq!(whole.fractional_part(), "");
        assert_eq!(whole.prefix_len(), 1);
    }

    #[test]
    fn test_repeatable() {
        let value = BigDecimal::from_str("1.4142135623730950488016887242096980785696").unwrap();
        let first = format_fixed(&value, DecimalPlaces::from(30));
        let second = format_fixed(&value, DecimalPlaces::from(30));
        assert_eq!(first, second);
    }
}
