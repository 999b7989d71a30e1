//! Integer minor-unit money amounts with display formatting.
//!
//! Invoice amounts and product prices are stored and filtered as raw integer
//! cents. Division by 100 happens only at the display boundary, never in
//! storage or arithmetic.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A USD amount in minor units (cents).
///
/// ## Examples
///
/// ```
/// use acme_core::Money;
///
/// assert_eq!(Money::new(1234).to_display(), "$12.34");
/// assert_eq!(Money::new(0).to_display(), "$0.00");
/// assert_eq!(Money::new(123_456_789).to_display(), "$1,234,567.89");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a money amount from raw cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Get the raw cents value.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Format as an en-US currency string, e.g. `$1,234.56`.
    ///
    /// Negative amounts render as `-$1,234.56`.
    #[must_use]
    pub fn to_display(&self) -> String {
        let abs = self.0.unsigned_abs();
        let dollars = group_thousands(abs / 100);
        let cents = abs % 100;
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}${dollars}.{cents:02}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Insert `,` separators every three digits from the right.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
