//! Shiprate CLI - Shipping rate resolution and quoting.
//!
//! # Usage
//!
//! ```bash
//! # Resolve one price per method for Germany
//! shiprate --rates rates.yaml resolve --country DE
//!
//! # Quote a shipment by mass
//! shiprate --rates rates.yaml quote --country FR --item 2x3.0 --item 1x4.0
//!
//! # List methods
//! shiprate --rates rates.yaml methods
//!
//! # Check input files
//! shiprate --rates rates.yaml --surcharge surcharge.yaml validate
//! ```
//!
//! # Commands
//!
//! - `resolve` - Resolve one price per method for a destination
//! - `quote` - Price a shipment with every method
//! - `methods` - List methods with their countries and price range
//! - `validate` - Check the rate table and surcharge schedule

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shiprate_cli::{commands, logging};
use shiprate_cli::config::{CliConfig, LogFormat};
use shiprate_core::{CountryCode, CountryScope, ShipmentItem};

#[derive(Parser)]
#[command(name = "shiprate")]
#[command(author, version, about = "Shipping rate resolution tools")]
struct Cli {
    /// Rate table YAML (overrides `SHIPRATE_RATES_FILE`)
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Surcharge schedule YAML (overrides `SHIPRATE_SURCHARGE_FILE`)
    #[arg(long, global = true)]
    surcharge: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one price per method for a destination
    Resolve {
        /// Destination country code, or `*` for Rest of World prices
        #[arg(short, long)]
        country: CountryScope,

        /// Restrict to these method IDs
        #[arg(short, long = "method")]
        methods: Vec<i32>,
    },
    /// Price a shipment with every method
    Quote {
        /// Destination country code
        #[arg(short, long)]
        country: CountryCode,

        /// Shipment line as QTYxMASS; without items flat prices are used
        #[arg(short, long = "item", value_parser = commands::quote::parse_item)]
        items: Vec<ShipmentItem>,

        /// Pricing time (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List methods with their countries and price range
    Methods,
    /// Check the rate table and surcharge schedule
    Validate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogFormat::default());
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(config.log_format);

    let config = config.with_overrides(cli.rates, cli.surcharge);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Resolve { country, methods } => {
            print_json(&commands::resolve::run(config, country, &methods).await?)
        }
        Commands::Quote { country, items, at } => {
            print_json(&commands::quote::run(config, country, &items, at).await?)
        }
        Commands::Methods => print_json(&commands::methods::run(config).await?),
        Commands::Validate => print_json(&commands::validate::run(config).await?),
    }
}

#[allow(clippy::print_stdout)]
fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
