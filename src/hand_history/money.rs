use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// An exact currency amount, stored as whole cents.
///
/// Buy-ins, rake, bounties and prizes come out of the transcript as decimal
/// strings like `"2.25"`. Storing cents keeps them exact; chip counts and
/// money never go through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: u64) -> Money {
        Money(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }

    /// Parse a decimal amount like `"0.23"` or `"11.5"` or `"3"`.
    ///
    /// At most two fraction digits are honored; more precision than a cent
    /// does not occur in this format.
    pub fn parse(s: &str) -> Option<Money> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let whole: u64 = whole.parse().ok()?;
        let frac_cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };
        Some(Money(whole * 100 + frac_cents))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
