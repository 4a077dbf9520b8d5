//! Quote every shipping method for a shipment.
//!
//! # Usage
//!
//! ```bash
//! # Flat prices for Germany
//! shiprate quote --country DE --rates rates.yaml
//!
//! # Price by mass: two items of 3.0 and one of 4.0
//! shiprate quote --country FR --item 2x3.0 --item 1x4.0
//!
//! # Price as of a past date
//! shiprate quote --country GB --item 1x2.5 --at 2019-03-31T12:00:00Z
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shiprate_core::{
    CountryCode, CountryRateTable, MassBasedSurchargeCalculator, ShipmentItem, ShippingQuote,
    SurchargeError,
};

use crate::config::CliConfig;
use crate::loader;

/// A quote labelled with its method name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRow {
    pub method: String,
    #[serde(flatten)]
    pub quote: ShippingQuote,
}

/// Parse a `QTYxMASS` item argument, e.g. `2x3.0`.
///
/// # Errors
///
/// Returns a message describing the malformed part.
pub fn parse_item(s: &str) -> Result<ShipmentItem, String> {
    let (quantity, mass) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected QTYxMASS, got '{s}'"))?;

    let quantity = quantity
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    let unit_mass = mass
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid mass '{mass}': {e}"))?;

    Ok(ShipmentItem::new(quantity, unit_mass))
}

/// Quote every method in `table` for `destination`.
///
/// Without items every method is quoted at its flat price.
///
/// # Errors
///
/// Returns an error if the mass-based path rejects the items.
pub fn quote(
    table: &CountryRateTable,
    calculator: &MassBasedSurchargeCalculator,
    items: &[ShipmentItem],
    destination: &CountryCode,
    at: DateTime<Utc>,
) -> Result<Vec<QuoteRow>, SurchargeError> {
    let quotes = shiprate_core::quote_all(table, calculator, Some(items), destination, at)?;

    Ok(quotes
        .into_iter()
        .map(|quote| QuoteRow {
            method: table
                .method(quote.shipping_method_id)
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            quote,
        })
        .collect())
}

/// Run the `quote` command.
///
/// # Errors
///
/// Returns an error if an input file cannot be loaded or an item is invalid.
pub async fn run(
    config: &CliConfig,
    country: CountryCode,
    items: &[ShipmentItem],
    at: Option<DateTime<Utc>>,
) -> Result<Vec<QuoteRow>, Box<dyn std::error::Error>> {
    let table = loader::load_rate_table(config.require_rates_file()?, config.default_currency).await?;
    let calculator =
        loader::load_calculator(config.surcharge_file.as_deref(), config.default_currency).await?;

    Ok(quote(&table, &calculator, items, &country, at.unwrap_or_else(Utc::now))?)
}
