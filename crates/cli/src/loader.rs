//! Load rate tables and surcharge schedules from YAML files.
//!
//! ## Rate Table Format
//!
//! ```yaml
//! methods:
//!   - id: 1
//!     name: Standard
//!     prices:
//!       - country: DE
//!         price: "10.00"
//!       - country: ""        # Rest of World
//!         price: "5.00"
//! ```
//!
//! ## Surcharge Schedule Format
//!
//! ```yaml
//! domestic_country: DE
//! domestic_rate: "1.0"
//! fallback_rate: "2.0"
//! tiers:
//!   - region: EU
//!     rate: "1.5"
//! regions:
//!   EU:
//!     - country: FR
//!     - country: GB
//!       until: 2019-04-01T00:00:00Z
//! ```

use std::path::Path;

use shiprate_core::{
    CountryRateTable, CurrencyCode, MassBasedSurchargeCalculator, RateTableDocument,
    RateTableError, SurchargeError, SurchargeSchedule,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid rate table in {path}: {source}")]
    RateTable {
        path: String,
        #[source]
        source: RateTableError,
    },
    #[error("Invalid surcharge schedule in {path}: {source}")]
    Surcharge {
        path: String,
        #[source]
        source: SurchargeError,
    },
}

async fn read_file(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Parse and validate a rate table document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or breaks a table invariant.
pub fn parse_rate_table(
    content: &str,
    currency: CurrencyCode,
    origin: &str,
) -> Result<CountryRateTable, LoadError> {
    let document: RateTableDocument =
        serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: origin.to_owned(),
            source,
        })?;

    document
        .into_table(currency)
        .map_err(|source| LoadError::RateTable {
            path: origin.to_owned(),
            source,
        })
}

/// Load a rate table priced in `currency`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
#[instrument(skip_all, fields(path = %path.display(), currency = %currency))]
pub async fn load_rate_table(
    path: &Path,
    currency: CurrencyCode,
) -> Result<CountryRateTable, LoadError> {
    let content = read_file(path).await?;
    let table = parse_rate_table(&content, currency, &path.display().to_string())?;

    info!(
        methods = table.methods().count(),
        prices = table.records().len(),
        "Rate table ready"
    );
    Ok(table)
}

/// Load the surcharge calculator, from `path` or the built-in schedule.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
#[instrument(skip_all, fields(path = ?path.map(Path::display), currency = %currency))]
pub async fn load_calculator(
    path: Option<&Path>,
    currency: CurrencyCode,
) -> Result<MassBasedSurchargeCalculator, LoadError> {
    let Some(path) = path else {
        info!("Using built-in surcharge schedule");
        return Ok(MassBasedSurchargeCalculator::with_default_schedule(currency));
    };

    let content = read_file(path).await?;
    parse_calculator(&content, currency, &path.display().to_string())
}

/// Parse and validate a surcharge schedule document.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or the schedule is invalid.
pub fn parse_calculator(
    content: &str,
    currency: CurrencyCode,
    origin: &str,
) -> Result<MassBasedSurchargeCalculator, LoadError> {
    let schedule: SurchargeSchedule =
        serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
            path: origin.to_owned(),
            source,
        })?;

    MassBasedSurchargeCalculator::new(schedule, currency).map_err(|source| LoadError::Surcharge {
        path: origin.to_owned(),
        source,
    })
}
