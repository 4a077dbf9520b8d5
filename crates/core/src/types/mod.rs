//! Core types for shipping rates.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod country;
pub mod id;
pub mod price;

pub use country::{CountryCode, CountryCodeError, CountryScope};
pub use id::*;
pub use price::{CurrencyCode, CurrencyCodeError, Price, PriceRange};
