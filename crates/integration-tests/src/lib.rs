//! Integration tests for Shiprate.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shiprate-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `resolution` - Country rate resolution
//! - `surcharge` - Mass-based surcharges and region cutoffs
//! - `rate_table` - Table invariants and YAML documents
//! - `cli_commands` - CLI commands against fixture files
//!
//! Fixture files live in `fixtures/` and are loaded with the helpers below.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use shiprate_core::{CountryCode, CountryScope, CurrencyCode, Price};

/// Path of a file in the `fixtures/` directory.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Contents of a fixture file.
///
/// # Panics
///
/// Panics if the fixture cannot be read.
#[must_use]
#[allow(clippy::expect_used)]
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should be readable")
}

/// Parse a country code known to be valid.
///
/// # Panics
///
/// Panics if `code` is not a valid country code.
#[must_use]
#[allow(clippy::expect_used)]
pub fn country(code: &str) -> CountryCode {
    CountryCode::parse(code).expect("valid country code")
}

/// Parse a scope known to be valid.
///
/// # Panics
///
/// Panics if `code` is not a valid scope.
#[must_use]
#[allow(clippy::expect_used)]
pub fn scope(code: &str) -> CountryScope {
    CountryScope::parse(code).expect("valid country scope")
}

/// A EUR price from cents.
#[must_use]
pub fn eur(cents: i64) -> Price {
    Price::from_cents(cents, CurrencyCode::EUR)
}

/// Midnight UTC at the start of the given day.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
#[allow(clippy::expect_used)]
pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}
