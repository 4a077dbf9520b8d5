//! Check input files without pricing anything.

use serde::Serialize;
use shiprate_core::{CountryRateTable, MassBasedSurchargeCalculator};
use tracing::info;

use crate::config::CliConfig;
use crate::loader;

/// What was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub methods: usize,
    pub prices: usize,
    pub wildcard_prices: usize,
    pub regions: Vec<String>,
    pub tiers: usize,
    pub builtin_schedule: bool,
}

/// Summarize a loaded table and calculator.
#[must_use]
pub fn summarize(
    table: &CountryRateTable,
    calculator: &MassBasedSurchargeCalculator,
    builtin_schedule: bool,
) -> ValidationSummary {
    let schedule = calculator.schedule();
    ValidationSummary {
        methods: table.methods().count(),
        prices: table.records().len(),
        wildcard_prices: table.records().iter().filter(|r| r.country.is_any()).count(),
        regions: schedule.regions.region_codes().map(str::to_owned).collect(),
        tiers: schedule.tiers.len(),
        builtin_schedule,
    }
}

/// Run the `validate` command.
///
/// # Errors
///
/// Returns the first problem found in the rate table or surcharge schedule.
pub async fn run(config: &CliConfig) -> Result<ValidationSummary, Box<dyn std::error::Error>> {
    let table = loader::load_rate_table(config.require_rates_file()?, config.default_currency).await?;
    let calculator =
        loader::load_calculator(config.surcharge_file.as_deref(), config.default_currency).await?;

    let summary = summarize(&table, &calculator, config.surcharge_file.is_none());
    info!(
        methods = summary.methods,
        prices = summary.prices,
        "Input files are valid"
    );
    Ok(summary)
}
