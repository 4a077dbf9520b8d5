//! Shipping quotes.
//!
//! There are two independent ways to price a shipment:
//!
//! - **Flat rate**: the price configured on the resolved
//!   [`ShippingMethodCountry`] record.
//! - **Mass based**: [`MassBasedSurchargeCalculator`] applied to the shipment
//!   lines. This path ignores the record's own country and price.
//!
//! [`quote`] picks the mass-based path whenever shipment lines are supplied
//! and falls back to the flat rate otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::ShippingMethodCountry;
use crate::rate_table::CountryRateTable;
use crate::surcharge::{
    MassBasedSurchargeCalculator, RateBasis, ShipmentLine, SurchargeError,
};
use crate::types::{CountryCode, CountryScope, Price, ShippingMethodCountryId, ShippingMethodId};

/// How a quote was priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum PricingPath {
    /// The record's configured price.
    FlatRate,
    /// Priced by shipment mass.
    MassBased {
        /// Rule that selected the rate.
        basis: RateBasis,
    },
}

/// The price of one shipping method for one shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingQuote {
    /// Quoted method.
    pub shipping_method_id: ShippingMethodId,
    /// Record the method was resolved to.
    pub record_id: ShippingMethodCountryId,
    /// Scope of that record.
    pub country: CountryScope,
    /// Price to charge.
    pub price: Price,
    /// How the price was reached.
    pub pricing: PricingPath,
}

/// Quote the record's configured price.
#[must_use]
pub fn flat_rate_quote(record: &ShippingMethodCountry) -> ShippingQuote {
    ShippingQuote {
        shipping_method_id: record.shipping_method_id,
        record_id: record.id,
        country: record.country,
        price: record.price,
        pricing: PricingPath::FlatRate,
    }
}

/// Quote by shipment mass, ignoring the record's configured price.
///
/// # Errors
///
/// Returns an error if a line has a negative mass or the arithmetic overflows.
pub fn mass_based_quote<L: ShipmentLine>(
    record: &ShippingMethodCountry,
    calculator: &MassBasedSurchargeCalculator,
    lines: &[L],
    destination: &CountryCode,
    at: DateTime<Utc>,
) -> Result<ShippingQuote, SurchargeError> {
    let breakdown = calculator.breakdown(lines, destination, at)?;
    Ok(ShippingQuote {
        shipping_method_id: record.shipping_method_id,
        record_id: record.id,
        country: record.country,
        price: breakdown.price,
        pricing: PricingPath::MassBased {
            basis: breakdown.basis,
        },
    })
}

/// Quote a resolved record, choosing the pricing path.
///
/// Uses the mass-based path when `lines` is `Some` and not empty, the flat
/// rate otherwise.
///
/// # Errors
///
/// Returns an error if the mass-based path rejects the lines.
pub fn quote<L: ShipmentLine>(
    record: &ShippingMethodCountry,
    calculator: &MassBasedSurchargeCalculator,
    lines: Option<&[L]>,
    destination: &CountryCode,
    at: DateTime<Utc>,
) -> Result<ShippingQuote, SurchargeError> {
    match lines {
        Some(lines) if !lines.is_empty() => {
            mass_based_quote(record, calculator, lines, destination, at)
        }
        _ => Ok(flat_rate_quote(record)),
    }
}

/// Quote every method that ships to `destination`, in method ID order.
///
/// Methods without a price for the destination are left out.
///
/// # Errors
///
/// Returns an error if the mass-based path rejects the lines.
#[instrument(skip_all, fields(destination = %destination, itemized = lines.is_some_and(|l| !l.is_empty())))]
pub fn quote_all<L: ShipmentLine>(
    table: &CountryRateTable,
    calculator: &MassBasedSurchargeCalculator,
    lines: Option<&[L]>,
    destination: &CountryCode,
    at: DateTime<Utc>,
) -> Result<Vec<ShippingQuote>, SurchargeError> {
    let quotes = table
        .resolve(&CountryScope::Country(*destination))
        .iter()
        .map(|record| quote(record, calculator, lines, destination, at))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(quotes = quotes.len(), "Quoted shipping methods");
    Ok(quotes)
}
