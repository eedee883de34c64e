//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices are stored in the currency's standard unit (naira, dollars),
//! never as floats.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-currency-tagged amount of money.
///
/// The store runs in a single configured currency, so prices carry only the
/// amount. Use [`Price::format`] with the store's [`CurrencyCode`] for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Format for display with the currency symbol (e.g., "₦2500.00").
    #[must_use]
    pub fn format(&self, currency: CurrencyCode) -> String {
        format!("{}{:.2}", currency.symbol(), self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// ISO 4217 currency codes the store can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::NGN => "₦",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NGN" => Ok(Self::NGN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

// SQLx support (with postgres feature): prices map to NUMERIC columns.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_times_quantity() {
        assert_eq!(Price::from_units(1000).times(2), Price::from_units(2000));
        assert_eq!(Price::from_units(1000).times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_units(2000), Price::from_units(500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(2500));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total, Price::ZERO);
    }

    #[test]
    fn test_format_with_currency() {
        let price = Price::new(Decimal::new(250_050, 2));
        assert_eq!(price.format(CurrencyCode::NGN), "₦2500.50");
        assert_eq!(price.format(CurrencyCode::USD), "$2500.50");
    }

    #[test]
    fn test_is_negative() {
        assert!(Price::from_units(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
        assert!(!Price::from_units(3).is_negative());
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Price::new(Decimal::new(1050, 2))).unwrap();
        assert_eq!(json, "\"10.50\"");
    }

    #[test]
    fn test_deserializes_from_number_or_string() {
        let from_str: Price = serde_json::from_str("\"1000\"").unwrap();
        let from_num: Price = serde_json::from_str("1000").unwrap();
        assert_eq!(from_str, Price::from_units(1000));
        assert_eq!(from_num, Price::from_units(1000));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("ngn".parse::<CurrencyCode>().unwrap(), CurrencyCode::NGN);
        assert_eq!(" GBP ".parse::<CurrencyCode>().unwrap(), CurrencyCode::GBP);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
