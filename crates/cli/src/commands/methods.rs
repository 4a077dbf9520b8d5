//! List shipping methods with the countries they price.

use serde::Serialize;
use shiprate_core::{CountryRateTable, PriceRange, ShippingMethodId};

use crate::config::CliConfig;
use crate::loader;

/// Summary of one shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSummary {
    pub id: ShippingMethodId,
    pub name: String,
    pub description: String,
    pub countries: Vec<String>,
    pub price_range: Option<PriceRange>,
}

/// Summarize every method in `table`, in ID order.
#[must_use]
pub fn summarize(table: &CountryRateTable) -> Vec<MethodSummary> {
    table
        .methods()
        .map(|method| MethodSummary {
            id: method.id,
            name: method.name.clone(),
            description: method.description.clone(),
            countries: table.countries(method.id),
            price_range: table.price_range(method.id),
        })
        .collect()
}

/// Run the `methods` command.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the rate table cannot
/// be loaded.
pub async fn run(config: &CliConfig) -> Result<Vec<MethodSummary>, Box<dyn std::error::Error>> {
    let table = loader::load_rate_table(config.require_rates_file()?, config.default_currency).await?;
    Ok(summarize(&table))
}
