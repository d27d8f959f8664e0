//! Value objects for the storefront domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price in Argentine pesos.
///
/// Formatting follows the shop's storefront convention: dot-separated
/// thousands, comma decimals, no forced decimal places (`$ 12.500`,
/// `$ 12.500,5`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: &Money) -> Money {
        Money(self.0 + other.0)
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money(self.0 * Decimal::from(qty))
    }

    /// Renders the amount as ARS currency text.
    pub fn format_ars(&self) -> String {
        let normalized = self.0.normalize();
        let text = normalized.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (text.as_str(), None),
        };

        let digits: Vec<char> = int_part.chars().collect();
        let mut grouped = String::new();
        for (i, digit) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*digit);
        }

        let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
            "-"
        } else {
            ""
        };
        match frac_part {
            Some(frac) => format!("{sign}$ {grouped},{frac}"),
            None => format!("{sign}$ {grouped}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_ars())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ars_groups_thousands() {
        assert_eq!(Money::new(Decimal::new(1_234_567, 0)).format_ars(), "$ 1.234.567");
        assert_eq!(Money::new(Decimal::new(999, 0)).format_ars(), "$ 999");
        assert_eq!(Money::new(Decimal::ZERO).format_ars(), "$ 0");
    }

    #[test]
    fn test_format_ars_keeps_real_decimals_only() {
        // 1500.50 normalizes to one decimal digit, 12000.00 to none.
        assert_eq!(Money::new(Decimal::new(150_050, 2)).format_ars(), "$ 1.500,5");
        assert_eq!(Money::new(Decimal::new(1_200_000, 2)).format_ars(), "$ 12.000");
    }

    #[test]
    fn test_multiply_and_add() {
        let unit = Money::new(Decimal::new(2500, 0));
        let subtotal = unit.multiply(3);
        assert_eq!(subtotal.amount(), Decimal::new(7500, 0));
        assert_eq!(subtotal.add(&unit).amount(), Decimal::new(10_000, 0));
    }

    #[test]
    fn test_negative_amount_keeps_sign() {
        assert_eq!(Money::new(Decimal::new(-1250, 0)).format_ars(), "-$ 1.250");
    }
}
