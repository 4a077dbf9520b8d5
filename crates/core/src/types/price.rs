//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places prices are rounded to.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., euros, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in minor units (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, PRICE_DECIMAL_PLACES), currency_code)
    }

    /// Returns the price rounded to two decimal places, midpoint away from zero.
    ///
    /// The amount always carries exactly two decimal places afterwards, so
    /// `15` becomes `15.00`.
    #[must_use]
    pub fn rounded(self) -> Self {
        let mut amount = self
            .amount
            .round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(PRICE_DECIMAL_PLACES);
        Self { amount, ..self }
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount
        )
    }
}

/// Errors that can occur when parsing a [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported currency code: {0}")]
pub struct CurrencyCodeError(pub String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol (e.g., "€").
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CurrencyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(CurrencyCodeError(s.to_owned())),
        }
    }
}

/// The cheapest and most expensive price of a shipping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price.
    pub min: Price,
    /// Highest price.
    pub max: Price,
}

impl PriceRange {
    /// Build the range spanning `prices`, or `None` if there are none.
    ///
    /// Prices are compared by amount only; callers keep them in one currency.
    #[must_use]
    pub fn from_prices<I>(prices: I) -> Option<Self>
    where
        I: IntoIterator<Item = Price>,
    {
        prices.into_iter().fold(None, |range, price| {
            Some(match range {
                None => Self {
                    min: price,
                    max: price,
                },
                Some(Self { min, max }) => Self {
                    min: if price.amount < min.amount { price } else { min },
                    max: if price.amount > max.amount { price } else { max },
                },
            })
        })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{} - {}", self.min, self.max)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn eur(s: &str) -> Price {
        Price::new(s.parse().unwrap(), CurrencyCode::EUR)
    }

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(1050, CurrencyCode::USD);
        assert_eq!(price.amount, "10.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_rounded_midpoint_away_from_zero() {
        assert_eq!(eur("2.345").rounded(), eur("2.35"));
        assert_eq!(eur("2.344").rounded(), eur("2.34"));
        assert_eq!(eur("2.5").rounded().amount.to_string(), "2.50");
    }

    #[test]
    fn test_rounded_has_two_decimal_places() {
        let whole = eur("15").rounded();
        assert_eq!(whole.amount.to_string(), "15.00");
        assert_eq!(whole.to_string(), "€15.00");
        assert_eq!(
            serde_json::to_value(whole).unwrap()["amount"],
            serde_json::to_value(Price::from_cents(1500, CurrencyCode::EUR)).unwrap()["amount"]
        );
    }

    #[test]
    fn test_is_negative() {
        assert!(eur("-0.01").is_negative());
        assert!(!eur("0").is_negative());
        assert!(!eur("-0").is_negative());
        assert!(!eur("3.10").is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(eur("10").to_string(), "€10.00");
        assert_eq!(
            Price::from_cents(599, CurrencyCode::GBP).to_string(),
            "£5.99"
        );
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert_eq!(CurrencyCode::AUD.to_string(), "AUD");
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_price_range() {
        assert_eq!(PriceRange::from_prices(Vec::new()), None);

        let range = PriceRange::from_prices([eur("10.00"), eur("5.00"), eur("7.50")]).unwrap();
        assert_eq!(range.min, eur("5.00"));
        assert_eq!(range.max, eur("10.00"));
        assert_eq!(range.to_string(), "€5.00 - €10.00");
    }

    #[test]
    fn test_price_range_single() {
        let range = PriceRange::from_prices([eur("4.00")]).unwrap();
        assert_eq!(range.min, range.max);
        assert_eq!(range.to_string(), "€4.00");
    }
}
