use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

const CENTS_PER_UNIT: i64 = 100;

/// An amount of money held as a whole number of cents, so sums and payouts never pick up float drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Money {
        Money(cents)
    }

    pub const fn from_units(units: i64) -> Money {
        Money(units * CENTS_PER_UNIT)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT as f64
    }

    /// Converts a float amount to money, rounding to the nearest cent.
    pub fn from_f64_rounded(amount: f64) -> Money {
        Money((amount * CENTS_PER_UNIT as f64).round() as i64)
    }

    /// Multiplies by `numerator / denominator` and rounds the result to the nearest cent, ties going to the
    /// even cent. A zero denominator yields `Money::ZERO`.
    pub fn scale_rounded(self, numerator: i64, denominator: i64) -> Money {
        if denominator == 0 {
            return Money::ZERO;
        }
        let (mut num, mut den) = (self.0 as i128 * numerator as i128, denominator as i128);
        if den < 0 {
            num = -num;
            den = -den;
        }
        let quotient = num.div_euclid(den);
        let remainder = num.rem_euclid(den);
        let rounded = match (remainder * 2).cmp(&den) {
            std::cmp::Ordering::Less => quotient,
            std::cmp::Ordering::Greater => quotient + 1,
            std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
            std::cmp::Ordering::Equal => quotient + 1,
        };
        Money(rounded as i64)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Money) -> Money {
        Money(self.0.max(other.0))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let text = format!("{}{}.{:02}", sign, abs / 100, abs % 100);
        f.pad(&text)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise(s.to_string()));
        }
        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .map_err(|_| MoneyParseError::Invalid(s.to_string()))?
                .checked_mul(CENTS_PER_UNIT)
                .ok_or_else(|| MoneyParseError::Invalid(s.to_string()))?
        };
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };
        let cents = whole_cents + fraction_cents;
        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an amount of money as a number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTS_PER_UNIT)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("amount out of range"))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        Ok(Money::from_f64_rounded(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_units(200).to_string(), "200.00");
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(150)), "    1.50");
    }

    #[test]
    fn parses_plain_and_dollar_amounts() {
        assert_eq!("10".parse::<Money>(), Ok(Money::from_units(10)));
        assert_eq!("$12.5".parse::<Money>(), Ok(Money::from_cents(1250)));
        assert_eq!("-0.25".parse::<Money>(), Ok(Money::from_cents(-25)));
        assert_eq!(".75".parse::<Money>(), Ok(Money::from_cents(75)));
    }

    #[test]
    fn rejects_bad_amounts() {
        assert_eq!("".parse::<Money>(), Err(MoneyParseError::Empty));
        assert!(matches!("1.234".parse::<Money>(), Err(MoneyParseError::TooPrecise(_))));
        assert!(matches!("ten".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
        assert!(matches!("1.234x".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
        assert!(matches!("$.".parse::<Money>(), Err(MoneyParseError::Invalid(_))));
    }

    #[test]
    fn scale_rounds_half_to_even() {
        // 2.5 times 0.05 is 0.125, halfway between 0.12 and 0.13
        assert_eq!(Money::from_cents(5).scale_rounded(5, 2), Money::from_cents(12));
        // 2.5 times 0.07 is 0.175
        assert_eq!(Money::from_cents(7).scale_rounded(5, 2), Money::from_cents(18));
        assert_eq!(Money::from_units(10).scale_rounded(5, 2), Money::from_units(25));
        assert_eq!(Money::from_units(10).scale_rounded(1, 0), Money::ZERO);
    }

    #[test]
    fn sums_and_arithmetic() {
        let amounts = vec![Money::from_units(1), Money::from_cents(50), Money::from_cents(25)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_cents(175));
        assert_eq!(total - Money::from_units(2), Money::from_cents(-25));
        assert_eq!(Money::from_cents(30) * 2, Money::from_cents(60));
    }

    #[test]
    fn serde_accepts_numbers_and_strings() {
        let from_int: Money = serde_json::from_str("200").unwrap();
        let from_float: Money = serde_json::from_str("12.5").unwrap();
        let from_str: Money = serde_json::from_str("\"7.25\"").unwrap();
        assert_eq!(from_int, Money::from_units(200));
        assert_eq!(from_float, Money::from_cents(1250));
        assert_eq!(from_str, Money::from_cents(725));
        assert_eq!(serde_json::to_string(&Money::from_cents(1250)).unwrap(), "12.5");
    }
}
