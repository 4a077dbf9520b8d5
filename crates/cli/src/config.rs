//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHIPRATE_RATES_FILE` - Rate table YAML (can be given with `--rates` instead)
//! - `SHIPRATE_SURCHARGE_FILE` - Surcharge schedule YAML (default: built-in schedule)
//! - `SHIPRATE_DEFAULT_CURRENCY` - Currency of all prices (default: USD)
//! - `SHIPRATE_LOG_FORMAT` - `text` or `json` (default: text)

use std::path::PathBuf;

use shiprate_core::CurrencyCode;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Rate table file
    pub rates_file: Option<PathBuf>,
    /// Surcharge schedule file; the built-in schedule is used when absent
    pub surcharge_file: Option<PathBuf>,
    /// Currency every price is expressed in
    pub default_currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_currency = lookup("SHIPRATE_DEFAULT_CURRENCY")
            .unwrap_or_else(|| CurrencyCode::default().code().to_owned())
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHIPRATE_DEFAULT_CURRENCY".to_string(), e.to_string())
            })?;

        let log_format = lookup("SHIPRATE_LOG_FORMAT")
            .map(|v| v.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("SHIPRATE_LOG_FORMAT".to_string(), e))?
            .unwrap_or_default();

        Ok(Self {
            rates_file: non_empty(lookup("SHIPRATE_RATES_FILE")).map(PathBuf::from),
            surcharge_file: non_empty(lookup("SHIPRATE_SURCHARGE_FILE")).map(PathBuf::from),
            default_currency,
            log_format,
        })
    }

    /// Apply command-line overrides on top of the environment.
    #[must_use]
    pub fn with_overrides(mut self, rates: Option<PathBuf>, surcharge: Option<PathBuf>) -> Self {
        if rates.is_some() {
            self.rates_file = rates;
        }
        if surcharge.is_some() {
            self.surcharge_file = surcharge;
        }
        self
    }

    /// The rate table file, which every command needs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if neither `--rates` nor
    /// `SHIPRATE_RATES_FILE` was given.
    pub fn require_rates_file(&self) -> Result<&PathBuf, ConfigError> {
        self.rates_file.as_ref().ok_or_else(|| {
            ConfigError::Missing("rate table file (--rates or SHIPRATE_RATES_FILE)".to_string())
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Treat empty values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.default_currency, CurrencyCode::USD);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.rates_file.is_none());
        assert!(config.surcharge_file.is_none());
    }

    #[test]
    fn test_values_from_environment() {
        let config = CliConfig::from_lookup(lookup_from(&[
            ("SHIPRATE_RATES_FILE", "rates.yaml"),
            ("SHIPRATE_SURCHARGE_FILE", "surcharge.yaml"),
            ("SHIPRATE_DEFAULT_CURRENCY", "eur"),
            ("SHIPRATE_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.rates_file, Some(PathBuf::from("rates.yaml")));
        assert_eq!(config.surcharge_file, Some(PathBuf::from("surcharge.yaml")));
        assert_eq!(config.default_currency, CurrencyCode::EUR);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_currency() {
        let result = CliConfig::from_lookup(lookup_from(&[("SHIPRATE_DEFAULT_CURRENCY", "XYZ")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(var, _)) if var == "SHIPRATE_DEFAULT_CURRENCY"));
    }

    #[test]
    fn test_invalid_log_format() {
        let result = CliConfig::from_lookup(lookup_from(&[("SHIPRATE_LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_empty_path_is_unset() {
        let config = CliConfig::from_lookup(lookup_from(&[("SHIPRATE_RATES_FILE", " ")])).unwrap();
        assert!(config.rates_file.is_none());
        assert!(config.require_rates_file().is_err());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = CliConfig::from_lookup(lookup_from(&[("SHIPRATE_RATES_FILE", "env.yaml")]))
            .unwrap()
            .with_overrides(Some(PathBuf::from("cli.yaml")), None);

        assert_eq!(config.require_rates_file().unwrap(), &PathBuf::from("cli.yaml"));
        assert!(config.surcharge_file.is_none());
    }
}
