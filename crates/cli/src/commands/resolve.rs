//! Resolve one price per shipping method for a destination.
//!
//! # Usage
//!
//! ```bash
//! # Every method that ships to Germany
//! shiprate resolve --country DE --rates rates.yaml
//!
//! # Only methods 1 and 3
//! shiprate resolve --country FR --method 1 --method 3
//!
//! # "Rest of World" prices only
//! shiprate resolve --country '*'
//! ```

use serde::Serialize;
use shiprate_core::{CountryRateTable, CountryScope, Price, ShippingMethodCountryId, ShippingMethodId};
use tracing::info;

use crate::config::CliConfig;
use crate::loader;

/// A resolved price, labelled with its method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    pub method_id: ShippingMethodId,
    pub method: String,
    pub record_id: ShippingMethodCountryId,
    pub country: CountryScope,
    pub country_label: String,
    pub price: Price,
}

/// Resolve `table` for `country`, optionally restricted to `methods`.
#[must_use]
pub fn resolve(
    table: &CountryRateTable,
    country: &CountryScope,
    methods: &[ShippingMethodId],
) -> Vec<ResolvedRate> {
    let mut resolved = table.resolve(country);
    if !methods.is_empty() {
        resolved = resolved.retain_methods(methods);
    }

    resolved
        .iter()
        .map(|record| ResolvedRate {
            method_id: record.shipping_method_id,
            method: table
                .method(record.shipping_method_id)
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            record_id: record.id,
            country: record.country,
            country_label: record.country.to_string(),
            price: record.price,
        })
        .collect()
}

/// Run the `resolve` command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the rate table cannot
/// be loaded.
pub async fn run(
    config: &CliConfig,
    country: CountryScope,
    methods: &[i32],
) -> Result<Vec<ResolvedRate>, Box<dyn std::error::Error>> {
    let table = loader::load_rate_table(config.require_rates_file()?, config.default_currency).await?;
    let methods: Vec<ShippingMethodId> = methods.iter().copied().map(ShippingMethodId::new).collect();

    let rates = resolve(&table, &country, &methods);
    if rates.is_empty() {
        info!(country = %country, "No shipping method available for destination");
    }
    Ok(rates)
}
